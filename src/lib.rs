//! ZoneGate 会话门控层
//!
//! 三个互相独立的认证域（user / admin / brand）各有自己的令牌存储与校验端点。
//! 本 crate 不依赖 DOM，浏览器相关的适配都在 `frontend` 中：
//! - `token`: 令牌存取（cookie / LocalStorage 回退链）
//! - `session`: 会话存储（登录标志 + 资料）
//! - `guard`: 参数化的路由守卫
//! - `route` / `zone`: 路由表与区域分类
//! - `flow`: 登录、注册、登出

pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod guard;
pub mod protocol;
pub mod request;
pub mod route;
pub mod session;
pub mod token;
pub mod zone;

#[cfg(test)]
mod testing;

pub use config::GateConfig;
pub use error::{GateError, GateErrorStatus, GateResult};
pub use guard::{Guard, GuardDecision, GuardPhase, GuardSpec, MountedGuard};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use route::AppRoute;
pub use session::{LoginStatus, SessionState, SessionStore};
pub use token::{MemoryStorage, TokenAccessor, TokenKind, TokenStorage};
pub use zone::{Chrome, RouteZone};
