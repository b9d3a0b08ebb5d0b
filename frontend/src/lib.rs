//! Zonegate 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话存储到信号的桥接
//! - `components`: UI 组件层（外框、守卫、表单、页面）
//!
//! 路由表、认证域划分与守卫逻辑都在 `zonegate` 核心库中。

mod session;
mod components {
    pub mod guard;
    pub mod layout;
    pub mod pages;
    pub mod signin;
}

use std::rc::Rc;

use crate::components::guard::ZoneGuard;
use crate::components::layout::Layout;
use crate::components::pages::*;
use crate::components::signin::{SignInPage, SignUpPage};
use crate::session::SessionContext;

use leptos::prelude::*;
use zonegate::{AppRoute, GateConfig, SessionStore, TokenAccessor, TokenKind};

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod cookie;
    mod http;
    pub mod router;
    mod storage;

    pub use cookie::CookieStorage;
    pub use http::FetchHttpClient;
    pub use storage::LocalStorageBackend;
}

use web::router::{Router, RouterOutlet};
use web::{CookieStorage, FetchHttpClient, LocalStorageBackend};

/// 编译期环境变量（`ZONEGATE_` 前缀）
fn build_env(key: &str) -> Option<String> {
    let value = match key {
        "BACKEND_URL" => option_env!("ZONEGATE_BACKEND_URL"),
        "USER_VERIFY_PATH" => option_env!("ZONEGATE_USER_VERIFY_PATH"),
        "ADMIN_VERIFY_PATH" => option_env!("ZONEGATE_ADMIN_VERIFY_PATH"),
        "BRAND_VERIFY_PATH" => option_env!("ZONEGATE_BRAND_VERIFY_PATH"),
        "USER_SIGNIN_PATH" => option_env!("ZONEGATE_USER_SIGNIN_PATH"),
        "USER_SIGNUP_PATH" => option_env!("ZONEGATE_USER_SIGNUP_PATH"),
        "ADMIN_SIGNIN_PATH" => option_env!("ZONEGATE_ADMIN_SIGNIN_PATH"),
        "BRAND_SIGNIN_PATH" => option_env!("ZONEGATE_BRAND_SIGNIN_PATH"),
        "BRAND_SIGNUP_PATH" => option_env!("ZONEGATE_BRAND_SIGNUP_PATH"),
        _ => None,
    };
    value.map(str::to_string)
}

/// 根据 AppRoute 枚举返回对应的页面视图
fn page_view(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Campaigns => view! { <CampaignsPage /> }.into_any(),
        AppRoute::Mall => view! { <MallPage /> }.into_any(),
        AppRoute::SignIn => view! { <SignInPage kind=TokenKind::User /> }.into_any(),
        AppRoute::SignUp => view! { <SignUpPage kind=TokenKind::User /> }.into_any(),
        AppRoute::BrandAuth => view! { <SignInPage kind=TokenKind::Brand /> }.into_any(),
        AppRoute::BrandSignup => view! { <SignUpPage kind=TokenKind::Brand /> }.into_any(),
        AppRoute::BrandPrice => view! { <BrandPricePage /> }.into_any(),
        AppRoute::UserApplyCampaign => view! { <ApplyCampaignPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::AdminAuth => view! { <SignInPage kind=TokenKind::Admin /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::AdminCampaigns => view! { <AdminCampaignsPage /> }.into_any(),
        AppRoute::AdminSection(section) => {
            view! { <SectionPage zone="admin" section=section /> }.into_any()
        }
        AppRoute::BrandDashboard => view! { <BrandDashboardPage /> }.into_any(),
        AppRoute::BrandSection(section) => {
            view! { <SectionPage zone="brand" section=section /> }.into_any()
        }
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

/// 路由匹配函数
///
/// 受保护的页面包在对应认证域的守卫里，守卫放行后才构建页面。
fn route_matcher(route: AppRoute) -> AnyView {
    match route.guard() {
        Some(kind) => view! {
            <ZoneGuard kind=kind>
                {move || page_view(route.clone())}
            </ZoneGuard>
        }
        .into_any(),
        None => page_view(route),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 构建会话存储（浏览器适配器注入核心库）
    let config = GateConfig::from_lookup(build_env);
    log::info!("[App] backend: {}", config.backend_url);

    let tokens = TokenAccessor::new(Rc::new(CookieStorage), Rc::new(LocalStorageBackend));
    let store = SessionStore::new(config, Rc::new(FetchHttpClient), tokens);

    // 2. 会话上下文
    provide_context(SessionContext::new(store));

    view! {
        // 3. 路由器 + 外框，守卫随页面挂载
        <Router>
            <Layout>
                <RouterOutlet matcher=route_matcher />
            </Layout>
        </Router>
    }
}
