//! 运行时配置
//!
//! 后端地址和各个端点路径都可以通过 key 查找函数覆盖，
//! 查不到（或为空）就使用默认值。存储键名不属于配置，见 `token` 模块。

// =========================================================
// 默认值
// =========================================================

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_USER_VERIFY_PATH: &str = "/api/user/auth/verify";
const DEFAULT_ADMIN_VERIFY_PATH: &str = "/admin/verify";
const DEFAULT_BRAND_VERIFY_PATH: &str = "/api/brand/auth/verify";
const DEFAULT_USER_SIGNIN_PATH: &str = "/api/user/auth/signin";
const DEFAULT_USER_SIGNUP_PATH: &str = "/api/user/auth/signup";
const DEFAULT_ADMIN_SIGNIN_PATH: &str = "/admin/login";
const DEFAULT_BRAND_SIGNIN_PATH: &str = "/api/brand/auth/login";
const DEFAULT_BRAND_SIGNUP_PATH: &str = "/api/brand/auth/signup";

/// 门控层配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// 后端基础地址（不带末尾 `/`）
    pub backend_url: String,
    pub user_verify_path: String,
    pub admin_verify_path: String,
    pub brand_verify_path: String,
    pub user_signin_path: String,
    pub user_signup_path: String,
    pub admin_signin_path: String,
    pub brand_signin_path: String,
    pub brand_signup_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl GateConfig {
    /// 通过 key 查找函数构建配置
    ///
    /// 浏览器端传入编译期 `option_env!` 的查表函数，测试中传入闭包。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            backend_url: read("BACKEND_URL", DEFAULT_BACKEND_URL)
                .trim_end_matches('/')
                .to_string(),
            user_verify_path: read("USER_VERIFY_PATH", DEFAULT_USER_VERIFY_PATH),
            admin_verify_path: read("ADMIN_VERIFY_PATH", DEFAULT_ADMIN_VERIFY_PATH),
            brand_verify_path: read("BRAND_VERIFY_PATH", DEFAULT_BRAND_VERIFY_PATH),
            user_signin_path: read("USER_SIGNIN_PATH", DEFAULT_USER_SIGNIN_PATH),
            user_signup_path: read("USER_SIGNUP_PATH", DEFAULT_USER_SIGNUP_PATH),
            admin_signin_path: read("ADMIN_SIGNIN_PATH", DEFAULT_ADMIN_SIGNIN_PATH),
            brand_signin_path: read("BRAND_SIGNIN_PATH", DEFAULT_BRAND_SIGNIN_PATH),
            brand_signup_path: read("BRAND_SIGNUP_PATH", DEFAULT_BRAND_SIGNUP_PATH),
        }
    }

    /// 拼接完整的端点 URL
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.backend_url, path)
        } else {
            format!("{}/{}", self.backend_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_lookup_is_empty() {
        let config = GateConfig::default();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(
            config.endpoint(&config.admin_verify_path),
            "http://localhost:8000/admin/verify"
        );
        assert_eq!(
            config.endpoint(&config.brand_verify_path),
            "http://localhost:8000/api/brand/auth/verify"
        );
    }

    #[test]
    fn lookup_overrides_and_ignores_blank_values() {
        let vars: HashMap<&str, &str> = [
            ("BACKEND_URL", "https://api.example.com/"),
            ("ADMIN_VERIFY_PATH", "internal/admin/verify"),
            ("BRAND_VERIFY_PATH", "   "),
        ]
        .into_iter()
        .collect();

        let config = GateConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend_url, "https://api.example.com");
        assert_eq!(
            config.endpoint(&config.admin_verify_path),
            "https://api.example.com/internal/admin/verify"
        );
        assert_eq!(config.brand_verify_path, "/api/brand/auth/verify");
    }
}
