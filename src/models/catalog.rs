//! 基础数据：区域、专业、周期、招生批次

use super::common::flexible_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 授课方式（报名与考试共用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Modality {
    #[default]
    #[serde(rename = "PRESENCIAL", alias = "Presencial")]
    Presencial,
    #[serde(rename = "VIRTUAL", alias = "Virtual")]
    Virtual,
    #[serde(rename = "HIBRIDO", alias = "Híbrido", alias = "HÍBRIDO")]
    Hibrido,
}

impl Modality {
    /// API 查询参数使用的写法
    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Presencial => "PRESENCIAL",
            Modality::Virtual => "VIRTUAL",
            Modality::Hibrido => "HIBRIDO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaRef>,
}

impl Career {
    /// 区域 ID 可能直接给出，也可能嵌在 `area` 里
    pub fn effective_area_id(&self) -> Option<&str> {
        self.area_id
            .as_deref()
            .or_else(|| self.area.as_ref().map(|a| a.id.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub careers: Vec<Career>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: String,
    pub name: String,
    #[serde(
        default,
        with = "flexible_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        default,
        with = "flexible_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// 新建/修改专业
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerInput {
    pub name: String,
    pub area_id: String,
}

/// 新建/修改招生批次
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modality_accepts_legacy_labels() {
        let m: Modality = serde_json::from_str("\"Híbrido\"").unwrap();
        assert_eq!(m, Modality::Hibrido);
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"HIBRIDO\"");
    }

    #[test]
    fn test_career_area_from_nested_object() {
        let career: Career =
            serde_json::from_str(r#"{"id":"c1","name":"Medicina","area":{"id":"a2"}}"#).unwrap();
        assert_eq!(career.effective_area_id(), Some("a2"));
    }
}
