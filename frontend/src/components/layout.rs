//! 页面外框
//!
//! 按路径前缀决定外框（导航栏+页脚 / 管理侧栏 / 品牌侧栏 / 无），
//! 并在进入公开或用户区域时触发一次会话校验。

use crate::session::{SessionContext, use_session};
use crate::web::router::{Link, RouterService, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use zonegate::flow::sign_out;
use zonegate::{AppRoute, Chrome, TokenKind};

/// 登出并跳转到该域的登录页
fn logout(session: SessionContext, router: RouterService, kind: TokenKind) {
    match sign_out(&session.store(), kind) {
        Ok(path) => router.redirect(&path),
        Err(e) => log::error!("[Layout] sign out failed: {}", e),
    }
}

#[component]
pub fn Layout(children: ChildrenFn) -> impl IntoView {
    let router = use_router();
    let session = use_session();
    let route = router.current_route();

    let chrome = Memo::new(move |_| route.get().chrome());
    let in_session_zone = Memo::new(move |_| route.get().zone().needs_session_verify());

    // admin / brand 区域完全跳过，省掉一次无关的请求
    Effect::new(move |_| {
        if in_session_zone.get() {
            let store = session.store();
            spawn_local(async move {
                let status = store.verify_login().await;
                log::debug!("[Layout] session status: {:?}", status);
            });
        }
    });

    move || {
        let page = children();
        match chrome.get() {
            Chrome::PublicNav => view! {
                <div class="flex flex-col min-h-screen">
                    <Navbar />
                    <main class="flex-1">{page}</main>
                    <Footer />
                </div>
            }
            .into_any(),
            Chrome::AdminSidebar => view! {
                <div class="flex min-h-screen">
                    <AdminSidebar />
                    <main class="flex-1 p-6 bg-base-200">{page}</main>
                </div>
            }
            .into_any(),
            Chrome::BrandSidebar => view! {
                <div class="flex min-h-screen">
                    <BrandSidebar />
                    <main class="flex-1 p-6 bg-base-200">{page}</main>
                </div>
            }
            .into_any(),
            Chrome::Bare => page.into_any(),
        }
    }
}

// ============================================================================
// 公开区域
// ============================================================================

#[component]
fn Navbar() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let is_login = move || session.state.get().is_login();
    let user_name = move || {
        session
            .state
            .get()
            .user
            .map(|u| u.name)
            .unwrap_or_default()
    };

    view! {
        <nav class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1 gap-2">
                <Link to=AppRoute::Home.to_path() class="btn btn-ghost text-xl">"Zonegate"</Link>
                <Link to=AppRoute::Campaigns.to_path() class="btn btn-ghost btn-sm">"Campaigns"</Link>
                <Link to=AppRoute::Mall.to_path() class="btn btn-ghost btn-sm">"Mall"</Link>
                <Link to=AppRoute::BrandPrice.to_path() class="btn btn-ghost btn-sm">"For Brands"</Link>
            </div>
            <div class="flex-none gap-2">
                <Show
                    when=is_login
                    fallback=|| view! {
                        <Link to=AppRoute::SignIn.to_path() class="btn btn-ghost btn-sm">"Sign in"</Link>
                        <Link to=AppRoute::SignUp.to_path() class="btn btn-primary btn-sm">"Sign up"</Link>
                    }
                >
                    <Link to=AppRoute::Profile.to_path() class="btn btn-ghost btn-sm">
                        {user_name}
                    </Link>
                    <button
                        class="btn btn-outline btn-sm"
                        on:click=move |_| logout(session, router, TokenKind::User)
                    >
                        "Sign out"
                    </button>
                </Show>
            </div>
        </nav>
    }
}

#[component]
fn Footer() -> impl IntoView {
    view! {
        <footer class="footer footer-center p-4 bg-base-200 text-base-content/60 text-sm">
            <Link to=AppRoute::BrandAuth.to_path()>"Brand login"</Link>
        </footer>
    }
}

// ============================================================================
// 管理 / 品牌后台
// ============================================================================

#[component]
fn AdminSidebar() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    view! {
        <aside class="w-56 bg-base-100 border-r border-base-300 flex flex-col">
            <div class="p-4 text-lg font-bold">"Admin"</div>
            <ul class="menu flex-1">
                <li><Link to=AppRoute::AdminDashboard.to_path()>"Dashboard"</Link></li>
                <li><Link to=AppRoute::AdminCampaigns.to_path()>"Campaigns"</Link></li>
                <li>
                    <a
                        href=AppRoute::BrandDashboard.to_path()
                        on:click=move |ev: leptos::ev::MouseEvent| {
                            ev.prevent_default();
                            // 记住是从管理后台进入的品牌后台
                            if let Err(e) = session.store().tokens().set_admin_mode(true) {
                                log::warn!("[Layout] failed to persist admin_mode: {}", e);
                            }
                            router.navigate(&AppRoute::BrandDashboard.to_path());
                        }
                    >
                        "Brand dashboard"
                    </a>
                </li>
            </ul>
            <button
                class="btn btn-ghost m-4"
                on:click=move |_| logout(session, router, TokenKind::Admin)
            >
                "Log out"
            </button>
        </aside>
    }
}

#[component]
fn BrandSidebar() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    // admin_mode 只用于导航记忆，与认证无关
    let admin_mode = session.store().tokens().admin_mode();
    let brand_name = move || {
        session
            .state
            .get()
            .brand
            .map(|b| b.name)
            .unwrap_or_else(|| "Brand".to_string())
    };

    view! {
        <aside class="w-56 bg-base-100 border-r border-base-300 flex flex-col">
            <div class="p-4 text-lg font-bold">{brand_name}</div>
            <ul class="menu flex-1">
                <li><Link to=AppRoute::BrandDashboard.to_path()>"Dashboard"</Link></li>
                <li>
                    <Link to=AppRoute::BrandSection("campaigns".to_string()).to_path()>
                        "Campaigns"
                    </Link>
                </li>
                <Show when=move || admin_mode>
                    <li><Link to=AppRoute::AdminDashboard.to_path()>"Back to admin"</Link></li>
                </Show>
            </ul>
            <button
                class="btn btn-ghost m-4"
                on:click=move |_| logout(session, router, TokenKind::Brand)
            >
                "Log out"
            </button>
        </aside>
    }
}
