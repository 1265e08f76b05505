//! 考试、考试明细与名单

use super::catalog::Modality;
use super::participant::{ParticipantIds, ParticipantKind, ParticipantRef};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExamType {
    #[default]
    Diario,
    Semanal,
    Simulacro,
}

impl ExamType {
    /// 模拟考的候选人包含意向学员
    pub fn admits_interested(self) -> bool {
        self == ExamType::Simulacro
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub modality: Modality,
    #[serde(rename = "type")]
    pub exam_type: ExamType,
    pub cycle_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 单个参与者的成绩记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDetail {
    pub id: String,
    pub exam_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub good_answers: Option<f64>,
    #[serde(default)]
    pub wrong_answers: Option<f64>,
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ExamDetail {
    /// 明细所属的参与者；两个外键都为空时返回 None
    pub fn participant(&self) -> Option<ParticipantRef> {
        match (&self.student_id, &self.external_id) {
            (Some(id), _) => Some(ParticipantRef::Student(id.clone())),
            (None, Some(id)) => Some(ParticipantRef::Interested(id.clone())),
            (None, None) => None,
        }
    }
}

/// `/exam/:id/roster` 的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub person_key: ParticipantRef,
    #[serde(default)]
    pub detail_id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "type")]
    pub kind: ParticipantKind,
    #[serde(default)]
    pub career_name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub good_answers: Option<f64>,
    #[serde(default)]
    pub wrong_answers: Option<f64>,
    #[serde(default)]
    pub total_score: Option<f64>,
}

/// 考试列表的统计行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub id: String,
    pub title: String,
    pub modality: Modality,
    #[serde(default)]
    pub assigned: u32,
}

/// 新建考试
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExam {
    pub title: String,
    pub modality: Modality,
    #[serde(rename = "type")]
    pub exam_type: ExamType,
    pub cycle_id: String,
}

/// 局部更新，未设置的字段不发送
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modality: Option<Modality>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub exam_type: Option<ExamType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<String>,
}

impl ExamUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// 可录入的成绩字段及其取值范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreField {
    Score,
    GoodAnswers,
    WrongAnswers,
    TotalScore,
}

impl ScoreField {
    pub fn range(self) -> (f64, f64) {
        match self {
            ScoreField::Score => (0.0, 20.0),
            ScoreField::GoodAnswers | ScoreField::WrongAnswers => (0.0, 100.0),
            ScoreField::TotalScore => (0.0, 400.0),
        }
    }

    /// 超出范围的值截断到边界；非数字视为未填写
    pub fn clamp(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let (min, max) = self.range();
        Some(value.clamp(min, max))
    }

    /// 请求体中的字段名
    pub fn wire_name(self) -> &'static str {
        match self {
            ScoreField::Score => "score",
            ScoreField::GoodAnswers => "goodAnswers",
            ScoreField::WrongAnswers => "wrongAnswers",
            ScoreField::TotalScore => "totalScore",
        }
    }

    pub fn read(self, entry: &RosterEntry) -> Option<f64> {
        match self {
            ScoreField::Score => entry.score,
            ScoreField::GoodAnswers => entry.good_answers,
            ScoreField::WrongAnswers => entry.wrong_answers,
            ScoreField::TotalScore => entry.total_score,
        }
    }
}

/// 成绩提交行，序列化为 `{"detailId": .., <字段名>: ..}`
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub detail_id: String,
    pub field: ScoreField,
    pub value: Option<f64>,
}

impl Serialize for ScoreRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("detailId", &self.detail_id)?;
        map.serialize_entry(self.field.wire_name(), &self.value)?;
        map.end()
    }
}

/// 一次性创建考试及其参与者
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamWithDetails {
    #[serde(flatten)]
    pub exam: NewExam,
    #[serde(flatten)]
    pub participants: ParticipantIds,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedExam {
    pub exam: Exam,
    #[serde(default)]
    pub created_students: u32,
    #[serde(default)]
    pub created_interested: u32,
}
