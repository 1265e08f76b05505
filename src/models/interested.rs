//! 意向学员（尚未报名，可参加模拟考）

use super::catalog::{Career, Cycle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interested {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone1: Option<String>,
    #[serde(default)]
    pub phone2: Option<String>,
    #[serde(default)]
    pub career_id: Option<String>,
    #[serde(default)]
    pub cycle_id: Option<String>,
    #[serde(default)]
    pub career: Option<Career>,
    #[serde(default)]
    pub cycle: Option<Cycle>,
}

impl Interested {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 周期可能以嵌套对象或外键形式出现，嵌套对象优先
    pub fn effective_cycle_id(&self) -> Option<&str> {
        self.cycle
            .as_ref()
            .map(|c| c.id.as_str())
            .or(self.cycle_id.as_deref())
    }

    pub fn effective_career_id(&self) -> Option<&str> {
        self.career
            .as_ref()
            .map(|c| c.id.as_str())
            .or(self.career_id.as_deref())
    }

    pub fn effective_area_id(&self) -> Option<&str> {
        self.career.as_ref().and_then(Career::effective_area_id)
    }

    pub fn career_name(&self) -> Option<&str> {
        self.career.as_ref().map(|c| c.name.as_str())
    }
}

/// 新建/修改意向学员的请求体
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestedDraft {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone2: Option<String>,
    pub career_id: String,
    pub cycle_id: String,
}
