//! 登录 / 注册 / 登出流程
//!
//! 每个认证域的令牌只由这里对应的登录流程写入，只由对应的守卫读取。

use serde::Serialize;

use crate::api::AuthCall;
use crate::error::{GateError, GateResult};
use crate::protocol::{Credentials, SignInResponse, SignUpRequest};
use crate::route::AppRoute;
use crate::session::SessionStore;
use crate::token::TokenKind;

/// 登录
///
/// 成功后写入令牌；user 域会立刻 `set_signin(true)`（乐观更新），
/// 响应中带了资料的话直接写入存储，省掉一次 verify。
pub async fn sign_in(
    store: &SessionStore,
    kind: TokenKind,
    credentials: &Credentials,
) -> GateResult<()> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(GateError::invalid_input("email and password are required")
            .in_op_with("flow.sign_in", kind.to_string()));
    }

    let config = store.config();
    let path = match kind {
        TokenKind::User => &config.user_signin_path,
        TokenKind::Admin => &config.admin_signin_path,
        TokenKind::Brand => &config.brand_signin_path,
    };

    authenticate(store, kind, &config.endpoint(path), credentials)
        .await
        .map_err(|e| e.in_op_with("flow.sign_in", kind.to_string()))
}

/// 注册（仅 user 与 brand）
pub async fn sign_up(
    store: &SessionStore,
    kind: TokenKind,
    request: &SignUpRequest,
) -> GateResult<()> {
    let config = store.config();
    let path = match kind {
        TokenKind::User => &config.user_signup_path,
        TokenKind::Brand => &config.brand_signup_path,
        TokenKind::Admin => {
            return Err(GateError::invalid_input("admin accounts cannot sign up")
                .in_op_with("flow.sign_up", kind.to_string()));
        }
    };

    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(GateError::invalid_input("name, email and password are required")
            .in_op_with("flow.sign_up", kind.to_string()));
    }

    authenticate(store, kind, &config.endpoint(path), request)
        .await
        .map_err(|e| e.in_op_with("flow.sign_up", kind.to_string()))
}

async fn authenticate<B: Serialize>(
    store: &SessionStore,
    kind: TokenKind,
    url: &str,
    body: &B,
) -> GateResult<()> {
    let client = store.client();
    let (token, response) = AuthCall { url, body }.send(client.as_ref()).await?;

    store.tokens().set(kind, &token)?;
    apply_profile(store, kind, response);
    log::info!("signed in to {} zone", kind);
    Ok(())
}

fn apply_profile(store: &SessionStore, kind: TokenKind, response: SignInResponse) {
    match kind {
        TokenKind::User => {
            store.set_signin(true);
            if let Some(user) = response.user {
                store.set_user(user);
            }
        }
        TokenKind::Brand => {
            if let Some(brand) = response.brand {
                store.set_brand(brand);
            }
        }
        TokenKind::Admin => {}
    }
}

/// 登出
///
/// 清除令牌与对应的会话状态，返回该域的登录页路径，由调用方负责跳转。
pub fn sign_out(store: &SessionStore, kind: TokenKind) -> GateResult<String> {
    store
        .tokens()
        .clear(kind)
        .map_err(|e| e.in_op_with("flow.sign_out", kind.to_string()))?;

    match kind {
        TokenKind::User => store.clear_user(),
        TokenKind::Brand => store.clear_brand(),
        TokenKind::Admin => store
            .tokens()
            .set_admin_mode(false)
            .map_err(|e| e.in_op_with("flow.sign_out", kind.to_string()))?,
    }

    log::info!("signed out of {} zone", kind);
    Ok(AppRoute::sign_in_for(kind).to_path())
}
