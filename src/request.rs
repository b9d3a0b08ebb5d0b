use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{GateError, GateResult};

#[cfg(test)]
use futures::channel::oneshot;
#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 状态码是否为 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> GateResult<T> {
        serde_json::from_str(&self.body).map_err(GateError::from)
    }
}

/// HTTP 客户端特性
///
/// (?Send) 是因为浏览器的 fetch future 不是 Send 的。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> GateResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

#[cfg(test)]
enum MockReply {
    Respond(u16, String),
    Fail(String),
}

#[cfg(test)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<String, MockReply>>,
    // 被 hold 的 URL 会一直挂起，直到测试通过 Sender 放行
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    pub requests: RefCell<Vec<RecordedRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            gates: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), MockReply::Respond(status, body.to_string()));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), MockReply::Respond(status, body.to_string()));
    }

    pub fn mock_failure(&self, url: &str, message: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), MockReply::Fail(message.to_string()));
    }

    /// 挂起下一次对 `url` 的请求，直到返回的 Sender 被触发或丢弃
    pub fn hold(&self, url: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(url.to_string(), rx);
        tx
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> GateResult<HttpResponse> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: req.url.clone(),
            method: req.method,
            headers: req.headers.clone(),
            body: req.body.clone(),
        });

        let gate = self.gates.borrow_mut().remove(&req.url);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let responses = self.responses.borrow();
        match responses.get(&req.url) {
            Some(MockReply::Respond(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(MockReply::Fail(message)) => Err(GateError::transport(message.clone())),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_covers_only_2xx() {
        let resp = |status| HttpResponse {
            status,
            body: String::new(),
        };
        assert!(resp(200).ok());
        assert!(resp(204).ok());
        assert!(!resp(199).ok());
        assert!(!resp(302).ok());
        assert!(!resp(401).ok());
    }

    #[tokio::test]
    async fn mock_records_headers_and_defaults_to_404() {
        let client = MockHttpClient::new();
        let req = HttpRequest::new("http://backend/x", HttpMethod::Get)
            .with_header("authorization", "abc");

        let resp = client.send(req).await.unwrap();

        assert_eq!(resp.status, 404);
        let recorded = client.last_request().unwrap();
        assert_eq!(recorded.headers.get("authorization").unwrap(), "abc");
        assert_eq!(recorded.method, HttpMethod::Get);
    }
}
