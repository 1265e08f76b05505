//! 报名（Enrollment）

use super::catalog::{Admission, Career, Cycle, Modality};
use super::common::flexible_date;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shift {
    #[default]
    #[serde(rename = "MANANA", alias = "Mañana", alias = "MAÑANA")]
    Manana,
    #[serde(rename = "TARDE", alias = "Tarde")]
    Tarde,
    #[serde(rename = "NOCHE", alias = "Noche")]
    Noche,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    #[default]
    #[serde(rename = "ACTIVO", alias = "Activo")]
    Activo,
    #[serde(rename = "CANCELADO", alias = "Cancelado")]
    Cancelado,
    #[serde(rename = "PENDIENTE", alias = "Pendiente")]
    Pendiente,
    #[serde(rename = "PAGADO", alias = "Pagado")]
    Pagado,
    #[serde(rename = "VENCIDO")]
    Vencido,
    #[serde(rename = "ANULADO")]
    Anulado,
}

/// 人员摘要（名单、报名列表中嵌套的学生）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PersonSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// 报名记录（列表接口返回的最新结构）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    #[serde(default, with = "flexible_date::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date::option")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub code_student: Option<String>,
    #[serde(default)]
    pub student: Option<PersonSummary>,
    #[serde(default)]
    pub career: Option<Career>,
    #[serde(default)]
    pub cycle: Option<Cycle>,
    #[serde(default)]
    pub admission: Option<Admission>,
    #[serde(default)]
    pub modality: Modality,
    #[serde(default)]
    pub shift: Shift,
    #[serde(default)]
    pub status: EnrollmentStatus,
    #[serde(default)]
    pub credit: bool,
    #[serde(default)]
    pub carnet_cost: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub num_installments: Option<u32>,
    #[serde(default)]
    pub initial_payment: Option<f64>,
    #[serde(default)]
    pub discounts: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 新建报名请求体。区域（areaId）只用于前端筛选专业，不在此结构中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollment {
    #[serde(with = "flexible_date")]
    pub start_date: NaiveDate,
    #[serde(with = "flexible_date")]
    pub end_date: NaiveDate,
    pub student_id: String,
    pub admission_id: String,
    pub cycle_id: String,
    pub career_id: String,
    pub modality: Modality,
    pub shift: Shift,
    pub credit: bool,
    pub payment_carnet: bool,
    pub carnet_cost: f64,
    pub total_cost: f64,
    pub num_installments: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_payment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EnrollmentStatus>,
}

/// `/enrollments/actives` 的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEnrollment {
    pub student: PersonSummary,
    #[serde(default)]
    pub career: Option<Career>,
}

/// 在读报名查询条件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveFilter {
    pub cycle_id: Option<String>,
    pub career_id: Option<String>,
    pub modality: Option<Modality>,
}

impl ActiveFilter {
    pub fn for_exam(cycle_id: &str, modality: Modality) -> Self {
        Self {
            cycle_id: Some(cycle_id.to_string()),
            career_id: None,
            modality: Some(modality),
        }
    }

    /// 转换为查询参数（空值不发送）
    pub fn to_query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("cycleId", self.cycle_id.clone()),
            ("careerId", self.career_id.clone()),
            ("modality", self.modality.map(|m| m.as_str().to_string())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_labels_are_accepted() {
        let shift: Shift = serde_json::from_str("\"Mañana\"").unwrap();
        assert_eq!(shift, Shift::Manana);
        let status: EnrollmentStatus = serde_json::from_str("\"Pendiente\"").unwrap();
        assert_eq!(status, EnrollmentStatus::Pendiente);
        assert_eq!(serde_json::to_string(&Shift::Manana).unwrap(), "\"MANANA\"");
    }

    #[test]
    fn test_active_enrollment_shape() {
        let row: ActiveEnrollment = serde_json::from_str(
            r#"{"student":{"id":"s1","firstName":"Luis","lastName":"Rojas"},
                "career":{"id":"c1","name":"Ingeniería Civil","areaId":"a1"}}"#,
        )
        .unwrap();
        assert_eq!(row.student.full_name(), "Luis Rojas");
        assert_eq!(row.career.unwrap().area_id.as_deref(), Some("a1"));
    }

    #[test]
    fn test_active_filter_skips_missing_values() {
        let filter = ActiveFilter::for_exam("cy1", Modality::Virtual);
        let query = filter.to_query();
        assert_eq!(query[0], ("cycleId", Some("cy1".to_string())));
        assert_eq!(query[1].1, None);
        assert_eq!(query[2].1.as_deref(), Some("VIRTUAL"));
    }
}
