//! 监护人（Tutor）

use super::student::Student;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TutorType {
    #[default]
    Padre,
    Madre,
    Tutor,
}

/// 已保存的监护人
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
    pub id: String,
    #[serde(default)]
    pub dni: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone1: Option<String>,
    #[serde(default)]
    pub phone2: Option<String>,
    #[serde(rename = "type", default)]
    pub tutor_type: TutorType,
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub students: Vec<Student>,
}

impl Tutor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// 尚未保存（或正在编辑）的监护人，用作 POST 请求体
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorDraft {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone2: Option<String>,
    #[serde(rename = "type")]
    pub tutor_type: TutorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl From<&Tutor> for TutorDraft {
    fn from(tutor: &Tutor) -> Self {
        Self {
            id: Some(tutor.id.clone()),
            dni: tutor.dni.clone(),
            first_name: tutor.first_name.clone(),
            last_name: tutor.last_name.clone(),
            email: tutor.email.clone(),
            phone1: tutor.phone1.clone(),
            phone2: tutor.phone2.clone(),
            tutor_type: tutor.tutor_type,
            observation: tutor.observation.clone(),
        }
    }
}

/// PATCH 请求体：DNI 与 ID 不允许修改
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorUpdate {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone1: Option<String>,
    #[serde(rename = "type")]
    pub tutor_type: TutorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl From<&TutorDraft> for TutorUpdate {
    fn from(draft: &TutorDraft) -> Self {
        Self {
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            phone1: draft.phone1.clone(),
            tutor_type: draft.tutor_type,
            email: draft.email.clone(),
            phone2: draft.phone2.clone(),
            observation: draft.observation.clone(),
        }
    }
}

impl From<&Tutor> for TutorUpdate {
    fn from(tutor: &Tutor) -> Self {
        Self::from(&TutorDraft::from(tutor))
    }
}

/// DNI 查询结果
///
/// 服务端有两种写法：`{available, tutor}` 或 `{exists, tutor}`，统一成 `available`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "DniCheckBody")]
pub struct DniCheck {
    pub available: bool,
    pub tutor: Option<Tutor>,
}

impl DniCheck {
    /// 查询失败时的默认结果：当作没有该监护人
    pub fn not_found() -> Self {
        Self {
            available: true,
            tutor: None,
        }
    }
}

#[derive(Deserialize)]
struct DniCheckBody {
    #[serde(default)]
    available: Option<bool>,
    #[serde(default)]
    exists: Option<bool>,
    #[serde(default)]
    tutor: Option<Tutor>,
}

impl From<DniCheckBody> for DniCheck {
    fn from(body: DniCheckBody) -> Self {
        let available = body
            .available
            .or(body.exists.map(|exists| !exists))
            .unwrap_or(body.tutor.is_none());
        Self {
            available,
            tutor: body.tutor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_never_serializes_id() {
        let draft = TutorDraft {
            id: Some("t-1".into()),
            dni: Some("12345678".into()),
            first_name: "Rosa".into(),
            last_name: "Quispe".into(),
            tutor_type: TutorType::Madre,
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["type"], "MADRE");
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_dni_check_accepts_both_shapes() {
        let a: DniCheck = serde_json::from_str(r#"{"available":true}"#).unwrap();
        assert!(a.available && a.tutor.is_none());

        let b: DniCheck = serde_json::from_str(
            r#"{"exists":true,"tutor":{"id":"t1","firstName":"Rosa","lastName":"Quispe","type":"MADRE"}}"#,
        )
        .unwrap();
        assert!(!b.available);
        assert_eq!(b.tutor.unwrap().tutor_type, TutorType::Madre);
    }

    #[test]
    fn test_update_body_excludes_dni() {
        let draft = TutorDraft {
            dni: Some("12345678".into()),
            first_name: "Rosa".into(),
            last_name: "Quispe".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(TutorUpdate::from(&draft)).unwrap();
        assert!(json.get("dni").is_none());
        assert_eq!(json["firstName"], "Rosa");
    }
}
