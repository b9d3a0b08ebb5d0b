//! 路由区域分类
//!
//! 每次导航都按路径前缀重新计算，不做缓存。
//! 必须先于任何守卫求值：它决定是否需要调用 `verify_login`。

use crate::route::AppRoute;
use crate::token::TokenKind;

const ADMIN_PREFIX: &str = "/admin";
const BRAND_PREFIX: &str = "/brand";
/// 共享 `/brand` 前缀但不属于品牌后台的公开路径
const BRAND_PUBLIC_PREFIXES: [&str; 3] = ["/brand-auth", "/brand-signup", "/brand-price"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteZone {
    Public,
    User,
    Admin,
    Brand,
}

impl RouteZone {
    pub fn classify(path: &str) -> Self {
        if path.starts_with(ADMIN_PREFIX) {
            return Self::Admin;
        }

        if path.starts_with(BRAND_PREFIX)
            && !BRAND_PUBLIC_PREFIXES
                .iter()
                .any(|prefix| path.starts_with(prefix))
        {
            return Self::Brand;
        }

        if AppRoute::from_path(path).guard() == Some(TokenKind::User) {
            Self::User
        } else {
            Self::Public
        }
    }

    /// admin/brand 区域完全跳过 user 会话校验
    pub fn needs_session_verify(&self) -> bool {
        matches!(self, Self::Public | Self::User)
    }
}

/// 页面外框
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chrome {
    /// 顶部导航 + 页脚
    PublicNav,
    AdminSidebar,
    BrandSidebar,
    Bare,
}

impl Chrome {
    pub fn for_zone(zone: RouteZone) -> Self {
        match zone {
            RouteZone::Public | RouteZone::User => Self::PublicNav,
            RouteZone::Admin => Self::AdminSidebar,
            RouteZone::Brand => Self::BrandSidebar,
        }
    }
}
