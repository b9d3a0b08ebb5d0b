//! 守卫组件
//!
//! 每次挂载都启动一次新的校验；组件卸载时中止校验，迟到的响应被丢弃。

use crate::session::use_session;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use zonegate::{Guard, GuardDecision, GuardPhase, TokenKind};

/// 全屏加载指示器
#[component]
pub fn FullScreenSpinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 认证域守卫
///
/// 校验期间显示全屏加载；失败时用 replace 语义跳到该域的登录页。
#[component]
pub fn ZoneGuard(kind: TokenKind, children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let guard = Guard::for_kind(kind, session.store());
    let spec = guard.spec().clone();
    let (phase, set_phase) = signal(GuardPhase::Loading);

    let (mounted, check) = guard.mount();
    on_cleanup(move || drop(mounted));

    spawn_local(async move {
        let decision = check.await;
        if decision == GuardDecision::Cancelled {
            return;
        }

        let redirect = match &decision {
            GuardDecision::Redirect(path) => Some(path.clone()),
            _ => None,
        };
        set_phase.set(GuardPhase::Resolved(decision));

        if let Some(path) = redirect {
            router.redirect(&path);
        }
    });

    // 只有结论真正改变时才重建页面
    let decision = Memo::new(move |_| {
        phase.with(|phase| spec.effective_decision(phase, || session.state.with(|s| s.status)))
    });

    move || match decision.get() {
        None => view! { <FullScreenSpinner /> }.into_any(),
        Some(GuardDecision::Render) => children().into_any(),
        Some(_) => ().into_any(),
    }
}
