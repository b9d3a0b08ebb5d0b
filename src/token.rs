//! 令牌存取层
//!
//! 三种令牌各自独立、互不共享命名空间：
//! - User:  cookie `token` + LocalStorage `token`（双写，读取时 cookie 优先）
//! - Admin: cookie `AdminToken`
//! - Brand: LocalStorage `BRAND_TOKEN`
//!
//! 这里不校验令牌格式，任何非空字符串都视为存在。

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{GateError, GateResult};

pub const USER_TOKEN_KEY: &str = "token";
pub const ADMIN_TOKEN_KEY: &str = "AdminToken";
pub const BRAND_TOKEN_KEY: &str = "BRAND_TOKEN";
/// 仅用于跨后台导航记忆，与鉴权无关
pub const ADMIN_MODE_KEY: &str = "admin_mode";

/// 认证域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    User,
    Admin,
    Brand,
}

impl TokenKind {
    pub fn storage_key(&self) -> &'static str {
        match self {
            TokenKind::User => USER_TOKEN_KEY,
            TokenKind::Admin => ADMIN_TOKEN_KEY,
            TokenKind::Brand => BRAND_TOKEN_KEY,
        }
    }

    fn uses_cookie(&self) -> bool {
        matches!(self, TokenKind::User | TokenKind::Admin)
    }

    fn uses_local(&self) -> bool {
        matches!(self, TokenKind::User | TokenKind::Brand)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::User => "user",
            TokenKind::Admin => "admin",
            TokenKind::Brand => "brand",
        };
        write!(f, "{}", name)
    }
}

// =========================================================
// 存储后端抽象
// =========================================================

/// 键值存储后端（cookie jar、LocalStorage、内存）
///
/// 浏览器存储的写入是同步的，所以这里不需要 async。
pub trait TokenStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> GateResult<()>;
    fn remove(&self, key: &str) -> GateResult<()>;
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> GateResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> GateResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// =========================================================
// 令牌访问器
// =========================================================

/// 令牌访问器
///
/// 持有 cookie 与 LocalStorage 两个后端，按 `TokenKind` 决定读写哪一个。
#[derive(Clone)]
pub struct TokenAccessor {
    cookies: Rc<dyn TokenStorage>,
    local: Rc<dyn TokenStorage>,
}

impl TokenAccessor {
    pub fn new(cookies: Rc<dyn TokenStorage>, local: Rc<dyn TokenStorage>) -> Self {
        Self { cookies, local }
    }

    /// 按读取顺序返回该类型涉及的存储（cookie 在前）
    fn stores(&self, kind: TokenKind) -> Vec<(&'static str, &dyn TokenStorage)> {
        let mut stores: Vec<(&'static str, &dyn TokenStorage)> = Vec::with_capacity(2);
        if kind.uses_cookie() {
            stores.push(("cookie", self.cookies.as_ref()));
        }
        if kind.uses_local() {
            stores.push(("local_storage", self.local.as_ref()));
        }
        stores
    }

    /// 返回第一个非空的令牌
    pub fn get(&self, kind: TokenKind) -> Option<String> {
        let key = kind.storage_key();
        self.stores(kind)
            .into_iter()
            .find_map(|(_, store)| store.get(key).filter(|v| !v.is_empty()))
    }

    pub fn has(&self, kind: TokenKind) -> bool {
        self.get(kind).is_some()
    }

    /// 写入令牌
    ///
    /// User 双写：只要有一个存储写入成功即视为成功。
    pub fn set(&self, kind: TokenKind, token: &str) -> GateResult<()> {
        if token.is_empty() {
            return Err(GateError::invalid_input("refusing to store an empty token")
                .in_op_with("token.set", kind.to_string()));
        }

        let key = kind.storage_key();
        let mut last_err = None;
        let mut written = 0;
        for (name, store) in self.stores(kind) {
            match store.set(key, token) {
                Ok(()) => written += 1,
                Err(e) => {
                    log::warn!("failed to write {} token to {}: {}", kind, name, e);
                    last_err = Some(e.in_op_with("token.set", format!("{}:{}", kind, name)));
                }
            }
        }

        match (written, last_err) {
            (0, Some(e)) => Err(e),
            _ => Ok(()),
        }
    }

    /// 从该类型涉及的所有存储中删除令牌
    pub fn clear(&self, kind: TokenKind) -> GateResult<()> {
        let key = kind.storage_key();
        let mut result = Ok(());
        for (name, store) in self.stores(kind) {
            if let Err(e) = store.remove(key) {
                result = Err(e.in_op_with("token.clear", format!("{}:{}", kind, name)));
            }
        }
        result
    }

    pub fn admin_mode(&self) -> bool {
        self.local.get(ADMIN_MODE_KEY).as_deref() == Some("true")
    }

    pub fn set_admin_mode(&self, enabled: bool) -> GateResult<()> {
        if enabled {
            self.local.set(ADMIN_MODE_KEY, "true")
        } else {
            self.local.remove(ADMIN_MODE_KEY)
        }
    }
}
