//! 与后端交互的数据结构
//!
//! 后端是黑盒，这里只描述门控层真正读取的字段；
//! 其余字段通过 `extra` 原样保留，页面可以自行取用。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 后端 payload 中表示成功的 status 值
pub const STATUS_SUCCESS: &str = "success";

// =========================================================
// 会话主体 (Profiles)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =========================================================
// 校验 (Verify)
// =========================================================

/// 三个 verify 端点共用的响应结构
///
/// admin: `{status}`；brand: `{status, brand}`；user: `{status, user}`。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub brand: Option<BrandProfile>,
}

impl VerifyResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

// =========================================================
// 登录 / 注册 (Sign-in / Sign-up)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub brand: Option<BrandProfile>,
}

impl SignInResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn brand_verify_payload_keeps_unknown_fields() {
        let body = json!({
            "status": "success",
            "brand": { "name": "Acme", "plan": "pro" }
        });
        let resp: VerifyResponse = serde_json::from_value(body).unwrap();

        assert!(resp.is_success());
        let brand = resp.brand.unwrap();
        assert_eq!(brand.name, "Acme");
        assert_eq!(brand.email, None);
        assert_eq!(brand.extra.get("plan"), Some(&json!("pro")));
    }

    #[test]
    fn admin_verify_payload_without_profile() {
        let resp: VerifyResponse = serde_json::from_value(json!({ "status": "fail" })).unwrap();
        assert!(!resp.is_success());
        assert!(resp.user.is_none());
        assert!(resp.brand.is_none());
    }
}
