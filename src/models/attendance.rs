//! 考勤

use super::common::flexible_date;
use super::enrollment::PersonSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    #[default]
    Asistio,
    Tardanza,
    Falta,
    FaltaJustificada,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub student_id: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub present: bool,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing)]
    pub student: Option<PersonSummary>,
}

/// `POST /attendance/seed-today` 的返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct SeedResult {
    #[serde(default)]
    pub created: u32,
}

/// 迟到记录查询条件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TardyFilter {
    pub area_id: Option<String>,
    pub career_id: Option<String>,
    pub only_latest_admission: Option<bool>,
}

impl TardyFilter {
    pub fn to_query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("areaId", self.area_id.clone()),
            ("careerId", self.career_id.clone()),
            (
                "onlyLatestAdmission",
                self.only_latest_admission.map(|b| b.to_string()),
            ),
        ]
    }
}
