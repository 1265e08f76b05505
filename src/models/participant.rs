//! 考试参与者标识
//!
//! 学生与意向学员是两个独立的 ID 空间。在名单 JSON 中用字符串键区分：
//! 学生 ID 原样出现，意向学员 ID 带 `ext-` 前缀。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 意向学员键前缀
pub const EXTERNAL_PREFIX: &str = "ext-";

/// 参与者引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParticipantRef {
    Student(String),
    Interested(String),
}

impl ParticipantRef {
    /// 编码为名单键
    pub fn key(&self) -> String {
        match self {
            ParticipantRef::Student(id) => id.clone(),
            ParticipantRef::Interested(id) => format!("{}{}", EXTERNAL_PREFIX, id),
        }
    }

    /// 从名单键解码：`ext-` 开头的是意向学员，其余都是学生
    pub fn from_key(key: &str) -> Self {
        match key.strip_prefix(EXTERNAL_PREFIX) {
            Some(id) => ParticipantRef::Interested(id.to_string()),
            None => ParticipantRef::Student(key.to_string()),
        }
    }

    /// 不带前缀的原始 ID
    pub fn id(&self) -> &str {
        match self {
            ParticipantRef::Student(id) | ParticipantRef::Interested(id) => id,
        }
    }

    pub fn kind(&self) -> ParticipantKind {
        match self {
            ParticipantRef::Student(_) => ParticipantKind::Matriculado,
            ParticipantRef::Interested(_) => ParticipantKind::Externo,
        }
    }
}

impl From<String> for ParticipantRef {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<ParticipantRef> for String {
    fn from(participant: ParticipantRef) -> Self {
        participant.key()
    }
}

impl fmt::Display for ParticipantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 名单中的参与者类别（显示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantKind {
    Matriculado,
    Externo,
}

/// 发送给服务端的参与者集合，两个 ID 空间分开传
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantIds {
    pub student_ids: Vec<String>,
    pub interested_ids: Vec<String>,
}

impl ParticipantIds {
    /// 按类别拆分，保持输入顺序
    pub fn from_refs<'a, I>(refs: I) -> Self
    where
        I: IntoIterator<Item = &'a ParticipantRef>,
    {
        let mut ids = Self::default();
        for participant in refs {
            match participant {
                ParticipantRef::Student(id) => ids.student_ids.push(id.clone()),
                ParticipantRef::Interested(id) => ids.interested_ids.push(id.clone()),
            }
        }
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.student_ids.is_empty() && self.interested_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.student_ids.len() + self.interested_ids.len()
    }
}
