//! 占位页面
//!
//! 页面内容不在本仓库范围内，这里只展示守卫和会话提供的数据。

use crate::session::use_session;
use leptos::prelude::*;

#[component]
fn Placeholder(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <section class="p-8">
            <h1 class="text-2xl font-bold mb-4">{title}</h1>
            {children()}
        </section>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    view! { <Placeholder title="Home">"Welcome."</Placeholder> }
}

#[component]
pub fn CampaignsPage() -> impl IntoView {
    view! { <Placeholder title="Campaigns">"Browse open campaigns."</Placeholder> }
}

#[component]
pub fn MallPage() -> impl IntoView {
    view! { <Placeholder title="Mall">"Browse products."</Placeholder> }
}

#[component]
pub fn BrandPricePage() -> impl IntoView {
    view! { <Placeholder title="Pricing">"Plans for brands."</Placeholder> }
}

#[component]
pub fn ApplyCampaignPage() -> impl IntoView {
    view! { <Placeholder title="Apply to a campaign">"Application form."</Placeholder> }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();

    let field = move |pick: fn(&zonegate::protocol::UserProfile) -> Option<String>| {
        move || {
            session
                .state
                .get()
                .user
                .as_ref()
                .and_then(pick)
                .unwrap_or_else(|| "-".to_string())
        }
    };

    view! {
        <Placeholder title="Profile">
            <dl class="grid grid-cols-2 gap-2 max-w-md">
                <dt class="font-semibold">"Name"</dt>
                <dd>{field(|u| Some(u.name.clone()))}</dd>
                <dt class="font-semibold">"Email"</dt>
                <dd>{field(|u| u.email.clone())}</dd>
                <dt class="font-semibold">"Country"</dt>
                <dd>{field(|u| u.country.clone())}</dd>
            </dl>
        </Placeholder>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    view! { <Placeholder title="Admin dashboard">"Overview."</Placeholder> }
}

#[component]
pub fn AdminCampaignsPage() -> impl IntoView {
    view! { <Placeholder title="Campaign management">"All campaigns."</Placeholder> }
}

/// `/admin/...` 与 `/brand/...` 下其余页面共用
#[component]
pub fn SectionPage(#[prop(into)] zone: String, #[prop(into)] section: String) -> impl IntoView {
    view! { <Placeholder title=format!("{} / {}", zone, section)>"Section content."</Placeholder> }
}

#[component]
pub fn BrandDashboardPage() -> impl IntoView {
    let session = use_session();

    let brand_name = move || {
        session
            .state
            .get()
            .brand
            .map(|b| b.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "your brand".to_string())
    };

    view! {
        <Placeholder title="Brand dashboard">
            <p>"Signed in as " <strong>{brand_name}</strong></p>
        </Placeholder>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"页面未找到"</p>
            </div>
        </div>
    }
}
