use serde::Serialize;

use crate::error::{GateError, GateResult};
use crate::protocol::{SignInResponse, VerifyResponse};
use crate::request::{HttpClient, HttpMethod, HttpRequest};

pub const AUTHORIZATION_HEADER: &str = "authorization";

/// 令牌放进 `authorization` 头的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// 原样发送（admin verify）
    Raw,
    /// `Bearer <token>`（brand / user verify）
    Bearer,
}

impl AuthScheme {
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {}", token),
        }
    }
}

// =========================================================
// 业务调用: VerifyCall
// =========================================================

/// 一次 verify 调用：`GET <url>`，令牌放在 `authorization` 头中
///
/// 成功的唯一条件是 2xx 且 payload 的 status 为 "success"。
pub struct VerifyCall<'a> {
    pub url: &'a str,
    pub scheme: AuthScheme,
    pub token: &'a str,
}

impl<'a> VerifyCall<'a> {
    pub async fn send(&self, client: &dyn HttpClient) -> GateResult<VerifyResponse> {
        let req = HttpRequest::new(self.url, HttpMethod::Get)
            .with_header(AUTHORIZATION_HEADER, &self.scheme.header_value(self.token));

        let resp = client
            .send(req)
            .await
            .map_err(|e| e.in_op_with("verify.send", self.url))?;

        if !resp.ok() {
            return Err(GateError::rejected(format!(
                "verify returned status {}",
                resp.status
            ))
            .in_op_with("verify.status", self.url));
        }

        let body: VerifyResponse = resp
            .json()
            .map_err(|e| e.in_op_with("verify.parse", self.url))?;

        if !body.is_success() {
            return Err(GateError::rejected(format!(
                "verify payload status was {:?}",
                body.status
            ))
            .in_op_with("verify.payload", self.url));
        }

        Ok(body)
    }
}

// =========================================================
// 业务调用: AuthCall (sign-in / sign-up)
// =========================================================

/// 登录/注册调用：`POST <url>`，JSON body，返回带令牌的 payload
pub struct AuthCall<'a, B: Serialize> {
    pub url: &'a str,
    pub body: &'a B,
}

impl<'a, B: Serialize> AuthCall<'a, B> {
    /// 返回 (token, response)
    pub async fn send(&self, client: &dyn HttpClient) -> GateResult<(String, SignInResponse)> {
        let body = serde_json::to_value(self.body)?;
        let req = HttpRequest::new(self.url, HttpMethod::Post)
            .with_header("Content-Type", "application/json")
            .with_body(body);

        let resp = client
            .send(req)
            .await
            .map_err(|e| e.in_op_with("auth.send", self.url))?;

        // 失败时后端通常也会返回 {status, message}，尽量取出 message
        let parsed = resp.json::<SignInResponse>();

        if !resp.ok() {
            let message = parsed
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| format!("request failed with status {}", resp.status));
            return Err(GateError::rejected(message).in_op_with("auth.status", self.url));
        }

        let payload = parsed.map_err(|e| e.in_op_with("auth.parse", self.url))?;

        if !payload.is_success() {
            let message = payload
                .message
                .clone()
                .unwrap_or_else(|| format!("payload status was {:?}", payload.status));
            return Err(GateError::rejected(message).in_op_with("auth.payload", self.url));
        }

        match payload.token.clone().filter(|t| !t.is_empty()) {
            Some(token) => Ok((token, payload)),
            None => Err(GateError::rejected("response did not include a token")
                .in_op_with("auth.token", self.url)),
        }
    }
}
