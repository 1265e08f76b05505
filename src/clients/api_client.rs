/// Academia REST API 客户端
///
/// 基础设施层：唯一持有 HTTP 连接池的组件，只暴露"发请求"的能力，
/// 不认识 Tutor / Enrollment 等业务概念
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::utils::logging::truncate_text;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

/// 查询参数列表，值为 `None` 的项不会被发送
pub type Query<'a> = [(&'a str, Option<String>)];

const NO_BODY: Option<&()> = None;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// 按配置创建客户端（超时统一作用于每个请求）
    pub fn new(config: &Config) -> ApiResult<Self> {
        Self::with_base_url(&config.api_base_url, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::RequestFailed {
                endpoint: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 发送请求
    ///
    /// # 返回
    /// - 2xx 且有 JSON 内容：`Some(T)`
    /// - 204 或空响应体：`None`
    /// - 非 2xx：`ApiError::BadResponse`，message 取自响应体的 `message` 字段
    /// - 超时：`ApiError::Timeout`
    pub async fn send<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &Query<'_>,
        body: Option<&B>,
    ) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let params: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();

        debug!("➡️ {} {} {:?}", method, endpoint, params);

        let mut request = self.http.request(method.clone(), &url);
        if !params.is_empty() {
            request = request.query(&params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(endpoint, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(endpoint, e))?;

        debug!("⬅️ {} {} -> {}", method, endpoint, status);

        if !status.is_success() {
            debug!(
                "⬅️ 错误响应: {}",
                truncate_text(&String::from_utf8_lossy(&bytes), 200)
            );
            return Err(error_from_body(endpoint, status, &bytes));
        }

        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<T>(&bytes)
            .map(Some)
            .map_err(|source| ApiError::JsonParseFailed {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// 发送请求并要求返回内容
    pub async fn fetch<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &Query<'_>,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(method, endpoint, query, body)
            .await?
            .ok_or_else(|| ApiError::EmptyResponse {
                endpoint: endpoint.to_string(),
            })
    }

    /// 发送请求，丢弃响应内容
    pub async fn execute<B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send::<B, JsonValue>(method, endpoint, &[], body)
            .await
            .map(|_| ())
    }

    // ========== 常用快捷方法 ==========

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.fetch(Method::GET, endpoint, &[], NO_BODY).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &Query<'_>,
    ) -> ApiResult<T> {
        self.fetch(Method::GET, endpoint, query, NO_BODY).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(Method::POST, endpoint, &[], Some(body)).await
    }

    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(Method::PATCH, endpoint, &[], Some(body)).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(Method::PUT, endpoint, &[], Some(body)).await
    }

    /// DELETE 的响应体可有可无
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Option<T>> {
        self.send(Method::DELETE, endpoint, &[], NO_BODY).await
    }

    /// 无请求体的 PATCH（例如作废付款）
    pub async fn patch_empty<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Option<T>> {
        self.send(Method::PATCH, endpoint, &[], NO_BODY).await
    }

    /// 无请求体的 POST（例如生成当日考勤）
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Option<T>> {
        self.send(Method::POST, endpoint, &[], NO_BODY).await
    }
}

fn transport_error(endpoint: &str, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        ApiError::RequestFailed {
            endpoint: endpoint.to_string(),
            source: error,
        }
    }
}

/// 解析错误响应：优先使用 `message` 字段，否则回退到 HTTP 状态说明
fn error_from_body(endpoint: &str, status: StatusCode, bytes: &[u8]) -> ApiError {
    let details: Option<JsonValue> = serde_json::from_slice(bytes).ok();

    let message = details
        .as_ref()
        .and_then(|d| d.get("message"))
        .and_then(|m| match m {
            JsonValue::String(s) => Some(s.clone()),
            // NestJS 校验管道会返回字符串数组
            JsonValue::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        })
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string())
        });

    ApiError::BadResponse {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        message,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_body_message() {
        let err = error_from_body(
            "/tutors",
            StatusCode::CONFLICT,
            br#"{"message":"DNI ya registrado","statusCode":409}"#,
        );
        assert_eq!(err.status(), 409);
        assert_eq!(err.message(), "DNI ya registrado");
        assert!(err.details().is_some());
    }

    #[test]
    fn test_error_message_joins_validation_array() {
        let err = error_from_body(
            "/students",
            StatusCode::BAD_REQUEST,
            br#"{"message":["firstName should not be empty","tutorId must be a UUID"]}"#,
        );
        assert_eq!(
            err.message(),
            "firstName should not be empty; tutorId must be a UUID"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status_text() {
        let err = error_from_body("/exam/1", StatusCode::NOT_FOUND, b"<html>nope</html>");
        assert_eq!(err.message(), "Not Found");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            ApiClient::with_base_url("http://localhost:3000/", Duration::from_secs(10)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
