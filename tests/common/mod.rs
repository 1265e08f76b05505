//! 进程内的 REST 模拟服务
//!
//! 记录每一次调用（方法、路径、查询串、请求体），按注册顺序匹配响应。

#![allow(dead_code)]

use academy_admin::ApiClient;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

impl Call {
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    body: Option<Value>,
    delay: Option<Duration>,
    once: bool,
}

#[derive(Clone, Default)]
struct MockState {
    calls: Arc<Mutex<Vec<Call>>>,
    routes: Arc<Mutex<Vec<Route>>>,
}

#[derive(Default)]
pub struct MockBuilder {
    routes: Vec<Route>,
}

impl MockBuilder {
    fn push(mut self, method: Method, path: &str, status: u16, body: Option<Value>) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            body,
            delay: None,
            once: false,
        });
        self
    }

    /// 返回 JSON
    pub fn on(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.push(method, path, status, Some(body))
    }

    /// 返回空响应体
    pub fn on_empty(self, method: Method, path: &str, status: u16) -> Self {
        self.push(method, path, status, None)
    }

    /// 只匹配一次，之后落到同路径的下一条
    pub fn once(mut self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self = self.push(method, path, status, Some(body));
        if let Some(route) = self.routes.last_mut() {
            route.once = true;
        }
        self
    }

    pub fn slow(mut self, method: Method, path: &str, delay: Duration, body: Value) -> Self {
        self = self.push(method, path, 200, Some(body));
        if let Some(route) = self.routes.last_mut() {
            route.delay = Some(delay);
        }
        self
    }

    pub async fn start(self) -> MockServer {
        let state = MockState {
            calls: Arc::default(),
            routes: Arc::new(Mutex::new(self.routes)),
        };
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

pub struct MockServer {
    pub base_url: String,
    state: MockState,
}

impl MockServer {
    pub fn builder() -> MockBuilder {
        MockBuilder::default()
    }

    pub fn client(&self) -> ApiClient {
        self.client_with_timeout(Duration::from_secs(5))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> ApiClient {
        ApiClient::with_base_url(&self.base_url, timeout).unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.calls().iter().map(Call::route).collect()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }
}

async fn handle(State(state): State<MockState>, method: Method, uri: Uri, body: String) -> Response {
    let call = Call {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_str(&body).ok(),
    };
    state.calls.lock().unwrap().push(call);

    let route = {
        let mut routes = state.routes.lock().unwrap();
        let index = routes
            .iter()
            .position(|r| r.method == method && r.path == uri.path());
        match index {
            Some(i) if routes[i].once => Some(routes.remove(i)),
            Some(i) => Some(routes[i].clone()),
            None => None,
        }
    };

    let Some(route) = route else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": format!("Cannot {} {}", method, uri.path()) })),
        )
            .into_response();
    };

    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }
    match route.body {
        Some(body) => (route.status, Json(body)).into_response(),
        None => route.status.into_response(),
    }
}
