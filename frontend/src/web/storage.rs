//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现 `zonegate::TokenStorage`。

use zonegate::{GateError, GateResult, TokenStorage};

/// 浏览器 LocalStorage 后端
#[derive(Clone, Copy, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    /// 获取 LocalStorage 实例（隐私模式下可能不可用）
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStorage for LocalStorageBackend {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> GateResult<()> {
        let storage = Self::storage()
            .ok_or_else(|| GateError::storage("localStorage unavailable").in_op("local.set"))?;
        storage.set_item(key, value).map_err(|e| {
            GateError::storage(format!("{:?}", e)).in_op_with("local.set", key.to_string())
        })
    }

    fn remove(&self, key: &str) -> GateResult<()> {
        let Some(storage) = Self::storage() else {
            return Ok(());
        };
        storage.remove_item(key).map_err(|e| {
            GateError::storage(format!("{:?}", e)).in_op_with("local.remove", key.to_string())
        })
    }
}
