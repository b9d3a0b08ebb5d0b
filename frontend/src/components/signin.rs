//! 登录 / 注册页面
//!
//! 三个认证域共用一套表单，差别只在标题、端点和成功后的落地页。

use crate::session::use_session;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use zonegate::flow::{sign_in, sign_up};
use zonegate::protocol::{Credentials, SignUpRequest};
use zonegate::{AppRoute, GateError, TokenKind};

fn title_for(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::User => "Sign in",
        TokenKind::Admin => "Admin console",
        TokenKind::Brand => "Brand sign in",
    }
}

/// 表单中展示给用户的错误信息，完整链路只进日志
fn report(kind: TokenKind, e: &GateError) -> String {
    log::warn!("[Auth:{}] {}", kind, e);
    e.message().to_string()
}

#[component]
fn ErrorAlert(error_msg: ReadSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error_msg.get().is_some()>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || error_msg.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn SignInPage(kind: TokenKind) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 已登录的用户不必停留在登录页
    if kind == TokenKind::User {
        Effect::new(move |_| {
            if session.state.get().is_login() {
                router.redirect(&AppRoute::home_for(kind).to_path());
            }
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let credentials = Credentials::new(email.get(), password.get());

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let store = session.store();
        spawn_local(async move {
            match sign_in(&store, kind, &credentials).await {
                Ok(()) => router.navigate(&AppRoute::home_for(kind).to_path()),
                Err(e) => set_error_msg.set(Some(report(kind, &e))),
            }
            set_is_submitting.set(false);
        });
    };

    let sign_up_link = match kind {
        TokenKind::User => Some(AppRoute::SignUp),
        TokenKind::Brand => Some(AppRoute::BrandSignup),
        TokenKind::Admin => None,
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold mb-4">{title_for(kind)}</h1>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert error_msg=error_msg />

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        {sign_up_link.map(|route| view! {
                            <p class="text-sm text-center mt-2">
                                <Link to=route.to_path() class="link">"Create an account"</Link>
                            </p>
                        })}
                    </form>
                </div>
            </div>
        </div>
    }
}

/// 注册页（仅 user 与 brand）
#[component]
pub fn SignUpPage(kind: TokenKind) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (country, set_country) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let country = country.get();
        let request = SignUpRequest {
            name: name.get(),
            email: email.get(),
            password: password.get(),
            country: (!country.trim().is_empty()).then_some(country),
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let store = session.store();
        spawn_local(async move {
            match sign_up(&store, kind, &request).await {
                Ok(()) => router.navigate(&AppRoute::home_for(kind).to_path()),
                Err(e) => set_error_msg.set(Some(report(kind, &e))),
            }
            set_is_submitting.set(false);
        });
    };

    let sign_in_link = AppRoute::sign_in_for(kind).to_path();
    let title = match kind {
        TokenKind::Brand => "Register your brand",
        _ => "Create an account",
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold mb-4">{title}</h1>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert error_msg=error_msg />

                        <input
                            type="text"
                            placeholder="Name"
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                            prop:value=name
                            class="input input-bordered"
                            required
                        />
                        <input
                            type="email"
                            placeholder="Email"
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            prop:value=email
                            class="input input-bordered"
                            required
                        />
                        <input
                            type="password"
                            placeholder="Password"
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            prop:value=password
                            class="input input-bordered"
                            required
                        />
                        <input
                            type="text"
                            placeholder="Country (optional)"
                            on:input=move |ev| set_country.set(event_target_value(&ev))
                            prop:value=country
                            class="input input-bordered"
                        />
                        <button class="btn btn-primary mt-4" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() { "Submitting..." } else { "Sign up" }}
                        </button>
                        <p class="text-sm text-center mt-2">
                            <Link to=sign_in_link class="link">"Already have an account?"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
