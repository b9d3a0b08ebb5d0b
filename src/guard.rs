//! 路由守卫
//!
//! 一个守卫实现，由 `GuardSpec` 参数化后实例化三次（user / admin / brand）：
//!
//! | 守卫  | 令牌来源                    | 校验                         | 成功             | 失败               |
//! |-------|-----------------------------|------------------------------|------------------|--------------------|
//! | user  | cookie 或 LocalStorage token | 仅检查存在                   | 渲染             | `/signin`          |
//! | admin | cookie AdminToken           | GET verify, 原样令牌         | 渲染             | `/admin/auth`      |
//! | brand | LocalStorage BRAND_TOKEN    | GET verify, Bearer 令牌      | 写入 brand 资料  | `/brand-auth`      |
//!
//! user 守卫是宽松的：只要令牌存在就渲染，真正的鉴权交给页面的 API 调用。
//! admin/brand 守卫是严格的：每次挂载都要一次网络往返。
//! 失败不会重试，也没有独立于 HTTP 客户端的超时。

#[cfg(test)]
mod tests;

use futures::FutureExt;
use futures::future::{AbortHandle, Abortable, LocalBoxFuture};
use uuid::Uuid;

use crate::api::{AuthScheme, VerifyCall};
use crate::config::GateConfig;
use crate::error::{GateError, GateResult};
use crate::protocol::VerifyResponse;
use crate::route::AppRoute;
use crate::session::{LoginStatus, SessionStore};
use crate::token::TokenKind;

/// 校验方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// 只检查令牌是否存在，不发请求
    TokenPresence,
    /// 向 `endpoint` 发 GET 请求校验
    Remote { endpoint: String, scheme: AuthScheme },
}

/// 校验成功后的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessAction {
    Render,
    /// 把响应中的 brand 资料写入会话存储，再渲染
    StoreBrandProfile,
}

/// 守卫配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardSpec {
    pub name: &'static str,
    pub kind: TokenKind,
    pub verification: Verification,
    pub on_success: SuccessAction,
    pub redirect_to: String,
}

impl GuardSpec {
    pub fn user() -> Self {
        Self {
            name: "user",
            kind: TokenKind::User,
            verification: Verification::TokenPresence,
            on_success: SuccessAction::Render,
            redirect_to: AppRoute::sign_in_for(TokenKind::User).to_path(),
        }
    }

    pub fn admin(config: &GateConfig) -> Self {
        Self {
            name: "admin",
            kind: TokenKind::Admin,
            verification: Verification::Remote {
                endpoint: config.endpoint(&config.admin_verify_path),
                scheme: AuthScheme::Raw,
            },
            on_success: SuccessAction::Render,
            redirect_to: AppRoute::sign_in_for(TokenKind::Admin).to_path(),
        }
    }

    pub fn brand(config: &GateConfig) -> Self {
        Self {
            name: "brand",
            kind: TokenKind::Brand,
            verification: Verification::Remote {
                endpoint: config.endpoint(&config.brand_verify_path),
                scheme: AuthScheme::Bearer,
            },
            on_success: SuccessAction::StoreBrandProfile,
            redirect_to: AppRoute::sign_in_for(TokenKind::Brand).to_path(),
        }
    }

    pub fn for_kind(kind: TokenKind, config: &GateConfig) -> Self {
        match kind {
            TokenKind::User => Self::user(),
            TokenKind::Admin => Self::admin(config),
            TokenKind::Brand => Self::brand(config),
        }
    }

    pub fn is_presence_only(&self) -> bool {
        self.verification == Verification::TokenPresence
    }

    /// 仅检查存在性的守卫：令牌存在时，根据当前登录状态决定渲染还是隐藏
    ///
    /// 状态尚未确定（Unknown/Pending）时照常渲染；
    /// 已确定为 Anonymous 时隐藏子内容但不重定向。
    pub fn presence_decision(status: LoginStatus) -> GuardDecision {
        match status {
            LoginStatus::Anonymous => GuardDecision::Suppress,
            _ => GuardDecision::Render,
        }
    }

    /// 登录状态变化后重新推导已得出的结论（只影响存在性守卫）
    pub fn reconcile(&self, decision: &GuardDecision, status: LoginStatus) -> GuardDecision {
        match decision {
            GuardDecision::Render | GuardDecision::Suppress if self.is_presence_only() => {
                Self::presence_decision(status)
            }
            other => other.clone(),
        }
    }

    /// UI 实际采用的结论，`None` 表示仍在加载
    ///
    /// 只有存在性守卫才会调用 `status`，其余守卫不依赖登录状态。
    /// 登录状态在 Unknown/Pending/Authenticated 之间变化时结果不变。
    pub fn effective_decision<F>(&self, phase: &GuardPhase, status: F) -> Option<GuardDecision>
    where
        F: FnOnce() -> LoginStatus,
    {
        match phase {
            GuardPhase::Loading => None,
            GuardPhase::Resolved(decision) if self.is_presence_only() => {
                Some(self.reconcile(decision, status()))
            }
            GuardPhase::Resolved(decision) => Some(decision.clone()),
        }
    }
}

/// 守卫结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// 不渲染子内容，也不跳转
    Suppress,
    Redirect(String),
    /// 守卫在得出结论前被卸载
    Cancelled,
}

/// 守卫所处阶段，供 UI 层渲染加载状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuardPhase {
    #[default]
    Loading,
    Resolved(GuardDecision),
}

/// 一次挂载的句柄
///
/// 被 drop（或显式 `unmount`）时中止尚未完成的校验，
/// 迟到的响应不会再写入任何状态。
#[derive(Debug)]
pub struct MountedGuard {
    id: Uuid,
    handle: AbortHandle,
}

impl MountedGuard {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn unmount(&self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_aborted()
    }
}

impl Drop for MountedGuard {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// 守卫
pub struct Guard {
    spec: GuardSpec,
    store: SessionStore,
}

impl Guard {
    pub fn new(spec: GuardSpec, store: SessionStore) -> Self {
        Self { spec, store }
    }

    pub fn for_kind(kind: TokenKind, store: SessionStore) -> Self {
        let spec = GuardSpec::for_kind(kind, store.config());
        Self::new(spec, store)
    }

    pub fn spec(&self) -> &GuardSpec {
        &self.spec
    }

    /// 挂载守卫
    ///
    /// 返回挂载句柄与校验 future。future 结束前 UI 应显示加载状态。
    pub fn mount(&self) -> (MountedGuard, LocalBoxFuture<'static, GuardDecision>) {
        let id = Uuid::new_v4();
        let (handle, registration) = AbortHandle::new_pair();
        let spec = self.spec.clone();
        let store = self.store.clone();
        let liveness = handle.clone();

        let check = async move {
            log::debug!("[Guard:{}] mount {}", spec.name, id);
            let evaluation = evaluate(&spec, &store, &liveness, id);
            match Abortable::new(evaluation, registration).await {
                Ok(decision) => {
                    log::info!("[Guard:{}] {} resolved: {:?}", spec.name, id, decision);
                    decision
                }
                Err(_) => {
                    log::debug!("[Guard:{}] {} unmounted before resolving", spec.name, id);
                    GuardDecision::Cancelled
                }
            }
        }
        .boxed_local();

        (MountedGuard { id, handle }, check)
    }
}

async fn evaluate(
    spec: &GuardSpec,
    store: &SessionStore,
    liveness: &AbortHandle,
    id: Uuid,
) -> GuardDecision {
    let token = match require_token(spec, store) {
        Ok(token) => token,
        Err(e) => {
            log::info!(
                "[Guard:{}] {} {}, redirecting to {}",
                spec.name,
                id,
                e,
                spec.redirect_to
            );
            return GuardDecision::Redirect(spec.redirect_to.clone());
        }
    };

    let (endpoint, scheme) = match &spec.verification {
        Verification::TokenPresence => return GuardSpec::presence_decision(store.status()),
        Verification::Remote { endpoint, scheme } => (endpoint, *scheme),
    };

    let response = match verify(spec, endpoint, scheme, &token, store).await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("[Guard:{}] {} verification failed: {}", spec.name, id, e);
            return GuardDecision::Redirect(spec.redirect_to.clone());
        }
    };

    // 提交任何状态之前确认挂载仍然有效
    if liveness.is_aborted() {
        return GuardDecision::Cancelled;
    }

    match spec.on_success {
        SuccessAction::Render => {}
        SuccessAction::StoreBrandProfile => {
            store.set_brand(response.brand.unwrap_or_default());
        }
    }
    GuardDecision::Render
}

fn require_token(spec: &GuardSpec, store: &SessionStore) -> GateResult<String> {
    store.tokens().get(spec.kind).ok_or_else(|| {
        GateError::missing_credential(format!("no {} token", spec.kind))
            .in_op_with("guard.require_token", spec.name)
    })
}

async fn verify(
    spec: &GuardSpec,
    endpoint: &str,
    scheme: AuthScheme,
    token: &str,
    store: &SessionStore,
) -> GateResult<VerifyResponse> {
    let client = store.client();
    VerifyCall {
        url: endpoint,
        scheme,
        token,
    }
    .send(client.as_ref())
    .await
    .map_err(|e: GateError| e.in_op_with("guard.verify", spec.name))
}
