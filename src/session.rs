//! 会话存储
//!
//! 只服务于 public/user 区域：保存登录状态与用户资料。
//! admin/brand 守卫不读这里的登录状态（brand 守卫只在成功后写入 brand 资料）。
//!
//! 存储实例通过构造函数注入依赖，并显式传给守卫，不存在全局单例。


use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::api::{AuthScheme, VerifyCall};
use crate::config::GateConfig;
use crate::error::GateResult;
use crate::protocol::{BrandProfile, UserProfile};
use crate::request::HttpClient;
use crate::token::{TokenAccessor, TokenKind};

/// 登录状态
///
/// `Unknown -> Pending -> {Authenticated, Anonymous}`，
/// 显式登出时 `Authenticated -> Anonymous`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginStatus {
    #[default]
    Unknown,
    Pending,
    Authenticated,
    Anonymous,
}

/// 会话状态快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub status: LoginStatus,
    pub user: Option<UserProfile>,
    pub brand: Option<BrandProfile>,
}

impl SessionState {
    pub fn is_login(&self) -> bool {
        self.status == LoginStatus::Authenticated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&SessionState)>;
type PendingVerify = Shared<LocalBoxFuture<'static, LoginStatus>>;

struct SessionInner {
    config: GateConfig,
    client: Rc<dyn HttpClient>,
    tokens: TokenAccessor,
    state: RefCell<SessionState>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_listener: Cell<u64>,
    // 正在进行的 verify_login，并发调用者共享同一个请求
    inflight: RefCell<Option<PendingVerify>>,
}

/// 会话存储句柄（克隆开销很小，共享同一份状态）
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl SessionStore {
    pub fn new(config: GateConfig, client: Rc<dyn HttpClient>, tokens: TokenAccessor) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                config,
                client,
                tokens,
                state: RefCell::new(SessionState::default()),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                inflight: RefCell::new(None),
            }),
        }
    }

    // --- Dependencies ---

    pub fn config(&self) -> &GateConfig {
        &self.inner.config
    }

    pub fn client(&self) -> Rc<dyn HttpClient> {
        self.inner.client.clone()
    }

    pub fn tokens(&self) -> &TokenAccessor {
        &self.inner.tokens
    }

    // --- Readers ---

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> LoginStatus {
        self.inner.state.borrow().status
    }

    pub fn is_login(&self) -> bool {
        self.inner.state.borrow().is_login()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.borrow().user.clone()
    }

    pub fn brand(&self) -> Option<BrandProfile> {
        self.inner.state.borrow().brand.clone()
    }

    // --- Subscriptions ---

    /// 注册状态变化监听器，只有状态真正改变时才会被调用
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + 'static,
    {
        let id = SubscriptionId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut SessionState),
    {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            let before = state.clone();
            mutate(&mut state);
            if *state == before {
                return;
            }
            state.clone()
        };

        // 先拷贝监听器列表，允许监听器内部再次调用 store
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    // --- Mutations ---

    /// 直接修改登录标志，登录/注册成功后立即调用以避免闪现未登录界面
    pub fn set_signin(&self, signed_in: bool) {
        self.update(|state| {
            state.status = if signed_in {
                LoginStatus::Authenticated
            } else {
                LoginStatus::Anonymous
            };
        });
    }

    pub fn set_user(&self, profile: UserProfile) {
        self.update(|state| state.user = Some(profile));
    }

    /// 登出：标记为匿名并丢弃用户资料
    pub fn clear_user(&self) {
        self.update(|state| {
            state.status = LoginStatus::Anonymous;
            state.user = None;
        });
    }

    pub fn set_brand(&self, profile: BrandProfile) {
        self.update(|state| state.brand = Some(profile));
    }

    pub fn clear_brand(&self) {
        self.update(|state| state.brand = None);
    }

    // --- Verification ---

    /// 用当前 user 令牌向后端校验身份
    ///
    /// 没有令牌时直接返回 `Anonymous`，不发请求。
    /// 同时进行的多次调用共享同一个请求与结果。
    pub async fn verify_login(&self) -> LoginStatus {
        let pending = {
            let mut inflight = self.inner.inflight.borrow_mut();
            match inflight.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let this = self.clone();
                    let pending = async move { this.run_verify().await }
                        .boxed_local()
                        .shared();
                    *inflight = Some(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    async fn run_verify(&self) -> LoginStatus {
        let status = match self.tokens().get(TokenKind::User) {
            None => {
                log::debug!("verify_login: no user token, staying anonymous");
                self.update(|state| {
                    state.status = LoginStatus::Anonymous;
                    state.user = None;
                });
                LoginStatus::Anonymous
            }
            Some(token) => {
                // 乐观登录后的重新校验不回退到 Pending，避免界面闪烁
                self.update(|state| {
                    if state.status != LoginStatus::Authenticated {
                        state.status = LoginStatus::Pending;
                    }
                });

                let result = self.fetch_user(&token).await;

                // 请求期间令牌已变（登出或重新登录），丢弃这次结果
                if self.tokens().get(TokenKind::User).as_deref() != Some(token.as_str()) {
                    log::debug!("verify_login: user token changed while verifying, ignoring result");
                    self.inner.inflight.borrow_mut().take();
                    return self.status();
                }

                match result {
                    Ok(profile) => {
                        log::info!("verify_login: authenticated as {:?}", profile.name);
                        self.update(|state| {
                            state.status = LoginStatus::Authenticated;
                            state.user = Some(profile);
                        });
                        LoginStatus::Authenticated
                    }
                    Err(e) => {
                        log::warn!("verify_login failed: {}", e);
                        self.update(|state| {
                            state.status = LoginStatus::Anonymous;
                            state.user = None;
                        });
                        LoginStatus::Anonymous
                    }
                }
            }
        };

        self.inner.inflight.borrow_mut().take();
        status
    }

    async fn fetch_user(&self, token: &str) -> GateResult<UserProfile> {
        let config = self.config();
        let url = config.endpoint(&config.user_verify_path);
        let call = VerifyCall {
            url: &url,
            scheme: AuthScheme::Bearer,
            token,
        };
        let resp = call
            .send(self.inner.client.as_ref())
            .await
            .map_err(|e| e.in_op("session.verify_login"))?;
        Ok(resp.user.unwrap_or_default())
    }
}
