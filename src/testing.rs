//! 测试夹具：内存存储 + MockHttpClient 组装出的会话存储

use std::rc::Rc;

use crate::config::GateConfig;
use crate::request::MockHttpClient;
use crate::session::SessionStore;
use crate::token::{MemoryStorage, TokenAccessor};

pub const BACKEND: &str = "http://backend.test";

pub struct Fixture {
    pub client: Rc<MockHttpClient>,
    pub cookies: Rc<MemoryStorage>,
    pub local: Rc<MemoryStorage>,
    pub store: SessionStore,
}

impl Fixture {
    pub fn new() -> Self {
        let config = GateConfig::from_lookup(|key| match key {
            "BACKEND_URL" => Some(BACKEND.to_string()),
            _ => None,
        });
        let client = Rc::new(MockHttpClient::new());
        let cookies = Rc::new(MemoryStorage::new());
        let local = Rc::new(MemoryStorage::new());
        let tokens = TokenAccessor::new(cookies.clone(), local.clone());
        let store = SessionStore::new(config, client.clone(), tokens);

        Self {
            client,
            cookies,
            local,
            store,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", BACKEND, path)
    }

    pub fn user_verify_url(&self) -> String {
        self.url(&self.store.config().user_verify_path)
    }

    pub fn admin_verify_url(&self) -> String {
        self.url(&self.store.config().admin_verify_path)
    }

    pub fn brand_verify_url(&self) -> String {
        self.url(&self.store.config().brand_verify_path)
    }
}
