//! 学生

use super::common::flexible_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub tutor_id: Option<String>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// 学生草稿（新建或编辑），`id` 不进入请求体
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(
        default,
        with = "flexible_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub tutor_id: String,
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            id: Some(student.id.clone()),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            dni: student.dni.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
            address: student.address.clone(),
            school: student.school.clone(),
            birthday: student.birthday,
            tutor_id: student.tutor_id.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_accepts_timestamp_birthday() {
        let student: Student = serde_json::from_str(
            r#"{"id":"s1","firstName":"Ana","lastName":"Paz","birthday":"2008-03-14T00:00:00.000Z","tutorId":"t1"}"#,
        )
        .unwrap();
        assert_eq!(student.birthday, NaiveDate::from_ymd_opt(2008, 3, 14));
        assert_eq!(student.full_name(), "Ana Paz");
    }

    #[test]
    fn test_draft_body_has_tutor_id_but_no_id() {
        let draft = StudentDraft {
            id: Some("s1".into()),
            first_name: "Ana".into(),
            last_name: "Paz".into(),
            tutor_id: "t1".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["tutorId"], "t1");
    }
}
