//! Cookie 封装模块
//!
//! 通过 `document.cookie` 读写，值做 URI component 编码。

use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;
use zonegate::{GateError, GateResult, TokenStorage};

/// 令牌 cookie 的有效期（秒）
const COOKIE_MAX_AGE: u32 = 60 * 60 * 24 * 7;

/// 浏览器 cookie 后端
#[derive(Clone, Copy, Default)]
pub struct CookieStorage;

impl CookieStorage {
    fn document() -> Option<HtmlDocument> {
        web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
    }

    fn write(key: &str, cookie: &str) -> GateResult<()> {
        let document = Self::document()
            .ok_or_else(|| GateError::storage("document unavailable").in_op("cookie.write"))?;
        document.set_cookie(cookie).map_err(|e| {
            GateError::storage(format!("{:?}", e)).in_op_with("cookie.write", key.to_string())
        })
    }
}

/// 从 `a=1; b=2` 形式的 cookie 串中取出 `name` 的原始值
fn find_cookie<'a>(jar: &'a str, name: &str) -> Option<&'a str> {
    jar.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

impl TokenStorage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        let jar = Self::document()?.cookie().ok()?;
        let raw = find_cookie(&jar, key)?;
        js_sys::decode_uri_component(raw)
            .ok()
            .and_then(|v| v.as_string())
    }

    fn set(&self, key: &str, value: &str) -> GateResult<()> {
        let encoded: String = js_sys::encode_uri_component(value).into();
        Self::write(
            key,
            &format!(
                "{}={}; path=/; max-age={}; SameSite=Lax",
                key, encoded, COOKIE_MAX_AGE
            ),
        )
    }

    fn remove(&self, key: &str) -> GateResult<()> {
        Self::write(key, &format!("{}=; path=/; max-age=0; SameSite=Lax", key))
    }
}
