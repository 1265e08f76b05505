//! 用户提示
//!
//! 每个流程结束时给出一条提示：成功或错误。

use crate::error::AppError;

const FALLBACK_ERROR: &str = "Error al procesar la solicitud";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            text: text.into(),
        }
    }

    /// 错误信息为空时使用通用提示
    pub fn from_error(err: &AppError) -> Self {
        let message = err.user_message();
        let text = if message.trim().is_empty() {
            FALLBACK_ERROR.to_string()
        } else {
            message
        };
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            text,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
