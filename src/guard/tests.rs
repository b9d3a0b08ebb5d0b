use super::*;
use crate::api::AUTHORIZATION_HEADER;
use crate::testing::Fixture;
use crate::token::{ADMIN_TOKEN_KEY, BRAND_TOKEN_KEY, TokenStorage, USER_TOKEN_KEY};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

// =========================================================
// 辅助函数
// =========================================================

async fn run(fx: &Fixture, kind: TokenKind) -> GuardDecision {
    let guard = Guard::for_kind(kind, fx.store.clone());
    let (_mounted, check) = guard.mount();
    check.await
}

fn redirect(path: &str) -> GuardDecision {
    GuardDecision::Redirect(path.to_string())
}

// =========================================================
// 缺少令牌
// =========================================================

#[tokio::test]
async fn missing_token_redirects_every_variant_without_network() {
    let fx = Fixture::new();

    assert_eq!(run(&fx, TokenKind::User).await, redirect("/signin"));
    assert_eq!(run(&fx, TokenKind::Admin).await, redirect("/admin/auth"));
    assert_eq!(run(&fx, TokenKind::Brand).await, redirect("/brand-auth"));
    assert_eq!(fx.client.request_count(), 0);
}

#[test]
fn missing_token_is_a_missing_credential_error() {
    let fx = Fixture::new();
    let spec = GuardSpec::brand(fx.store.config());

    let err = require_token(&spec, &fx.store).unwrap_err();
    assert_eq!(err.status, crate::error::GateErrorStatus::MissingCredential);
    assert_eq!(err.spans()[0].operation, "guard.require_token");

    fx.local.set(BRAND_TOKEN_KEY, "b").unwrap();
    assert_eq!(require_token(&spec, &fx.store).unwrap(), "b");
}

#[tokio::test]
async fn admin_without_cookie_redirects_to_admin_auth() {
    // 场景：/admin/campaigns，没有 AdminToken cookie
    let fx = Fixture::new();
    let route = AppRoute::from_path("/admin/campaigns");
    let kind = route.guard().unwrap();

    assert_eq!(run(&fx, kind).await, redirect("/admin/auth"));
}

// =========================================================
// user 守卫（宽松）
// =========================================================

#[tokio::test]
async fn user_guard_renders_on_token_in_either_store() {
    let fx = Fixture::new();
    fx.cookies.set(USER_TOKEN_KEY, "c").unwrap();
    assert_eq!(run(&fx, TokenKind::User).await, GuardDecision::Render);

    let fx = Fixture::new();
    fx.local.set(USER_TOKEN_KEY, "l").unwrap();
    assert_eq!(run(&fx, TokenKind::User).await, GuardDecision::Render);
    assert_eq!(fx.client.request_count(), 0);
}

#[tokio::test]
async fn user_guard_renders_while_login_is_resolving() {
    let fx = Fixture::new();
    fx.local.set(USER_TOKEN_KEY, "tok").unwrap();
    fx.client
        .mock_response(&fx.user_verify_url(), 200, json!({ "status": "success" }));
    let release = fx.client.hold(&fx.user_verify_url());

    let store = fx.store.clone();
    let (_, decision) = futures::join!(fx.store.verify_login(), async move {
        assert_eq!(store.status(), LoginStatus::Pending);
        let (_mounted, check) = Guard::for_kind(TokenKind::User, store.clone()).mount();
        let decision = check.await;
        let _ = release.send(());
        decision
    });

    assert_eq!(decision, GuardDecision::Render);
}

#[tokio::test]
async fn user_guard_suppresses_when_login_resolved_false() {
    let fx = Fixture::new();
    fx.cookies.set(USER_TOKEN_KEY, "tok").unwrap();
    fx.store.set_signin(false);

    assert_eq!(run(&fx, TokenKind::User).await, GuardDecision::Suppress);
}

#[tokio::test]
async fn user_apply_campaign_without_any_token_goes_to_signin() {
    // 场景：/UserApplyCampaign，cookie 与 LocalStorage 都没有 token
    let fx = Fixture::new();
    let kind = AppRoute::from_path("/UserApplyCampaign").guard().unwrap();

    assert_eq!(run(&fx, kind).await, redirect("/signin"));
}

#[test]
fn reconcile_follows_login_status_for_presence_guard_only() {
    let config = GateConfig::default();
    let user = GuardSpec::user();
    let admin = GuardSpec::admin(&config);

    assert_eq!(
        user.reconcile(&GuardDecision::Render, LoginStatus::Anonymous),
        GuardDecision::Suppress
    );
    assert_eq!(
        user.reconcile(&GuardDecision::Suppress, LoginStatus::Authenticated),
        GuardDecision::Render
    );
    assert_eq!(
        user.reconcile(&redirect("/signin"), LoginStatus::Authenticated),
        redirect("/signin")
    );
    assert_eq!(
        admin.reconcile(&GuardDecision::Render, LoginStatus::Anonymous),
        GuardDecision::Render
    );
}

#[test]
fn effective_decision_is_stable_while_session_resolves() {
    let user = GuardSpec::user();
    let resolved = GuardPhase::Resolved(GuardDecision::Render);

    assert_eq!(user.effective_decision(&GuardPhase::Loading, || LoginStatus::Unknown), None);
    for status in [
        LoginStatus::Unknown,
        LoginStatus::Pending,
        LoginStatus::Authenticated,
    ] {
        assert_eq!(
            user.effective_decision(&resolved, || status),
            Some(GuardDecision::Render)
        );
    }
    assert_eq!(
        user.effective_decision(&resolved, || LoginStatus::Anonymous),
        Some(GuardDecision::Suppress)
    );
}

#[test]
fn effective_decision_never_reads_status_for_remote_guards() {
    let config = GateConfig::default();
    let reads = Cell::new(0);
    let status = || {
        reads.set(reads.get() + 1);
        LoginStatus::Anonymous
    };

    for spec in [GuardSpec::admin(&config), GuardSpec::brand(&config)] {
        let phase = GuardPhase::Resolved(GuardDecision::Render);
        assert_eq!(spec.effective_decision(&phase, status), Some(GuardDecision::Render));
    }
    assert_eq!(reads.get(), 0);
}

// =========================================================
// admin 守卫（严格）
// =========================================================

#[tokio::test]
async fn admin_success_renders_and_sends_raw_token() {
    let fx = Fixture::new();
    fx.cookies.set(ADMIN_TOKEN_KEY, "adm-1").unwrap();
    fx.client
        .mock_response(&fx.admin_verify_url(), 200, json!({ "status": "success" }));

    assert_eq!(run(&fx, TokenKind::Admin).await, GuardDecision::Render);

    let req = fx.client.last_request().unwrap();
    assert_eq!(req.url, fx.admin_verify_url());
    assert_eq!(req.headers.get(AUTHORIZATION_HEADER).unwrap(), "adm-1");
}

#[tokio::test]
async fn admin_rejection_and_network_errors_redirect() {
    let fx = Fixture::new();
    fx.cookies.set(ADMIN_TOKEN_KEY, "adm-1").unwrap();
    let url = fx.admin_verify_url();

    fx.client.mock_response(&url, 200, json!({ "status": "expired" }));
    assert_eq!(run(&fx, TokenKind::Admin).await, redirect("/admin/auth"));

    fx.client.mock_response(&url, 403, json!({ "status": "success" }));
    assert_eq!(run(&fx, TokenKind::Admin).await, redirect("/admin/auth"));

    fx.client.mock_failure(&url, "dns failure");
    assert_eq!(run(&fx, TokenKind::Admin).await, redirect("/admin/auth"));

    // 没有重试：每次挂载恰好一次请求
    assert_eq!(fx.client.request_count(), 3);
}

#[tokio::test]
async fn admin_stays_loading_until_verify_settles() {
    let fx = Fixture::new();
    fx.cookies.set(ADMIN_TOKEN_KEY, "adm-1").unwrap();
    fx.client
        .mock_response(&fx.admin_verify_url(), 200, json!({ "status": "success" }));
    let release = fx.client.hold(&fx.admin_verify_url());

    let guard = Guard::for_kind(TokenKind::Admin, fx.store.clone());
    let (_mounted, mut check) = guard.mount();

    assert!(futures::poll!(&mut check).is_pending());
    assert!(futures::poll!(&mut check).is_pending());

    let _ = release.send(());
    assert_eq!(check.await, GuardDecision::Render);
}

#[tokio::test]
async fn admin_guard_ignores_user_session_state() {
    let fx = Fixture::new();
    fx.cookies.set(ADMIN_TOKEN_KEY, "adm-1").unwrap();
    fx.store.set_signin(false);
    fx.client
        .mock_response(&fx.admin_verify_url(), 200, json!({ "status": "success" }));

    assert_eq!(run(&fx, TokenKind::Admin).await, GuardDecision::Render);
}

// =========================================================
// brand 守卫
// =========================================================

#[tokio::test]
async fn brand_success_stores_profile_once() {
    // 场景：/brand/dashboard，BRAND_TOKEN 有效
    let fx = Fixture::new();
    fx.local.set(BRAND_TOKEN_KEY, "brand-1").unwrap();
    fx.client.mock_response(
        &fx.brand_verify_url(),
        200,
        json!({ "status": "success", "brand": { "name": "Acme" } }),
    );
    let writes = Rc::new(Cell::new(0));
    let counter = writes.clone();
    fx.store.subscribe(move |state| {
        if state.brand.is_some() {
            counter.set(counter.get() + 1);
        }
    });

    let kind = AppRoute::from_path("/brand/dashboard").guard().unwrap();
    assert_eq!(run(&fx, kind).await, GuardDecision::Render);

    let brand = fx.store.brand().unwrap();
    assert_eq!(brand.name, "Acme");
    assert!(brand.email.is_none());
    assert!(brand.extra.is_empty());
    assert_eq!(writes.get(), 1);

    let req = fx.client.last_request().unwrap();
    assert_eq!(req.headers.get(AUTHORIZATION_HEADER).unwrap(), "Bearer brand-1");
}

#[tokio::test]
async fn brand_failure_redirects_and_leaves_profile_empty() {
    let fx = Fixture::new();
    fx.local.set(BRAND_TOKEN_KEY, "brand-1").unwrap();
    fx.client
        .mock_response(&fx.brand_verify_url(), 401, json!({ "status": "fail" }));

    assert_eq!(run(&fx, TokenKind::Brand).await, redirect("/brand-auth"));
    assert!(fx.store.brand().is_none());
}

#[tokio::test]
async fn brand_token_in_cookie_does_not_count() {
    let fx = Fixture::new();
    fx.cookies.set(BRAND_TOKEN_KEY, "brand-1").unwrap();

    assert_eq!(run(&fx, TokenKind::Brand).await, redirect("/brand-auth"));
    assert_eq!(fx.client.request_count(), 0);
}

// =========================================================
// 取消
// =========================================================

#[tokio::test]
async fn unmount_before_response_cancels_and_commits_nothing() {
    let fx = Fixture::new();
    fx.local.set(BRAND_TOKEN_KEY, "brand-1").unwrap();
    fx.client.mock_response(
        &fx.brand_verify_url(),
        200,
        json!({ "status": "success", "brand": { "name": "Acme" } }),
    );
    let release = fx.client.hold(&fx.brand_verify_url());

    let guard = Guard::for_kind(TokenKind::Brand, fx.store.clone());
    let (mounted, check) = guard.mount();
    assert!(mounted.is_active());

    let (decision, _) = futures::join!(check, async move {
        // 用户已经离开该页面
        drop(mounted);
        let _ = release.send(());
    });

    assert_eq!(decision, GuardDecision::Cancelled);
    assert_eq!(fx.client.request_count(), 1);
    assert!(fx.store.brand().is_none());
}

#[tokio::test]
async fn independent_mounts_do_not_interfere() {
    let fx = Fixture::new();
    fx.cookies.set(ADMIN_TOKEN_KEY, "adm").unwrap();
    fx.local.set(BRAND_TOKEN_KEY, "brd").unwrap();
    fx.client
        .mock_response(&fx.admin_verify_url(), 200, json!({ "status": "success" }));
    fx.client.mock_response(
        &fx.brand_verify_url(),
        200,
        json!({ "status": "success", "brand": { "name": "Acme" } }),
    );
    let release_admin = fx.client.hold(&fx.admin_verify_url());

    let admin = Guard::for_kind(TokenKind::Admin, fx.store.clone());
    let brand = Guard::for_kind(TokenKind::Brand, fx.store.clone());
    let (admin_mount, admin_check) = admin.mount();
    let (_brand_mount, brand_check) = brand.mount();

    let (admin_decision, brand_decision) = futures::join!(admin_check, async move {
        let decision = brand_check.await;
        admin_mount.unmount();
        let _ = release_admin.send(());
        decision
    });

    assert_eq!(admin_decision, GuardDecision::Cancelled);
    assert_eq!(brand_decision, GuardDecision::Render);
    assert_eq!(fx.store.brand().unwrap().name, "Acme");
}

#[test]
fn each_mount_gets_its_own_id() {
    let fx = Fixture::new();
    let guard = Guard::for_kind(TokenKind::Admin, fx.store.clone());
    let (a, _) = guard.mount();
    let (b, _) = guard.mount();
    assert_ne!(a.id(), b.id());
}
