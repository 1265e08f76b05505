//! 错误类型
//!
//! 分四类：网络/超时、API 返回错误、表单校验错误、流程不变量错误。
//! 另有配置与草稿文件相关的错误。

use serde_json::Value as JsonValue;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 表单校验错误（不会发出任何网络请求）
    #[error("校验错误: {0}")]
    Validation(#[from] validator::ValidationErrors),
    /// 流程不变量被破坏
    #[error("流程错误: {0}")]
    Workflow(#[from] WorkflowError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求超过客户端超时时间
    #[error("Request timeout ({endpoint})")]
    Timeout { endpoint: String },
    /// 网络请求失败（连接失败、DNS 等）
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非 2xx 响应
    #[error("{message} (status={status}, {endpoint})")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: String,
        details: Option<JsonValue>,
    },
    /// 需要响应体，但服务端返回 204 或空内容
    #[error("API返回空结果: {endpoint}")]
    EmptyResponse { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP 语义上的状态码；超时固定为 408，本地失败为 500
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Timeout { .. } => 408,
            ApiError::BadResponse { status, .. } => *status,
            ApiError::RequestFailed { .. }
            | ApiError::EmptyResponse { .. }
            | ApiError::JsonParseFailed { .. } => 500,
        }
    }

    /// 面向用户的错误信息
    pub fn message(&self) -> String {
        match self {
            ApiError::Timeout { .. } => "Request timeout".to_string(),
            ApiError::BadResponse { message, .. } => message.clone(),
            ApiError::RequestFailed { source, .. } => source.to_string(),
            ApiError::EmptyResponse { endpoint } => format!("Respuesta vacía de {}", endpoint),
            ApiError::JsonParseFailed { source, .. } => source.to_string(),
        }
    }

    /// 服务端返回的原始错误体
    pub fn details(&self) -> Option<&JsonValue> {
        match self {
            ApiError::BadResponse { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }
}

/// 流程错误：由编排代码显式抛出
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("No se pudo obtener el ID del estudiante")]
    MissingStudentId,
    #[error("No se pudo obtener el ID del tutor")]
    MissingTutorId,
    #[error("No hay datos del tutor/estudiante para guardar")]
    MissingDraft,
    #[error("Datos de conflicto incompletos")]
    IncompleteConflict,
    #[error("Acción de resolución de conflicto no válida: {0}")]
    InvalidConflictAction(String),
    /// 学生 ID 未确定前不能进入学业信息步骤
    #[error("Primero registre los datos del estudiante")]
    StepLocked,
    #[error("La fila {key} no tiene detalle de examen; no se puede registrar nota")]
    ScoreNotEditable { key: String },
    #[error("El pago {id} ya ha sido anulado")]
    PaymentAlreadyCancelled { id: String },
    #[error("El DNI debe tener 8 dígitos: {0}")]
    InvalidDni(String),
    #[error("Participante desconocido: {0}")]
    UnknownParticipant(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取或解析失败
    #[error("配置文件 {path} 无效: {reason}")]
    InvalidFile { path: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败 ({path}): {reason}")]
    TomlParseFailed { path: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 若是 API 错误，返回其状态码
    pub fn api_status(&self) -> Option<u16> {
        match self {
            AppError::Api(e) => Some(e.status()),
            _ => None,
        }
    }

    /// 提取面向用户的信息（不含内部前缀）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(e) => e.message(),
            AppError::Workflow(e) => e.to_string(),
            AppError::Validation(errors) => first_validation_message(errors)
                .unwrap_or_else(|| "Datos del formulario inválidos".to_string()),
            AppError::Config(e) => e.to_string(),
            AppError::File(e) => e.to_string(),
        }
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields.into_iter().find_map(|(_, errs)| {
        errs.iter()
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
    })
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// API 层结果类型
pub type ApiResult<T> = Result<T, ApiError>;
