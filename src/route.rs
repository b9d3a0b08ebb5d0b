//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys。
//! 定义了应用的所有路由、它们所属的区域、外框 (chrome) 以及需要的守卫。

use std::fmt::Display;

use crate::token::TokenKind;
use crate::zone::{Chrome, RouteZone};

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    // --- 公开页面 ---
    #[default]
    Home,
    Campaigns,
    Mall,
    SignIn,
    SignUp,
    BrandAuth,
    BrandSignup,
    BrandPrice,

    // --- 用户页面 (User 守卫) ---
    UserApplyCampaign,
    Profile,

    // --- 管理后台 ---
    /// 管理员登录页，不受守卫保护
    AdminAuth,
    AdminDashboard,
    AdminCampaigns,
    /// 其他任意深度的 `/admin/...` 页面
    AdminSection(String),

    // --- 品牌后台 ---
    BrandDashboard,
    /// 其他任意深度的 `/brand/...` 页面
    BrandSection(String),

    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（忽略末尾的 `/`）
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };

        match path {
            "/" => Self::Home,
            "/campaigns" => Self::Campaigns,
            "/mall" => Self::Mall,
            "/signin" => Self::SignIn,
            "/signup" => Self::SignUp,
            "/brand-auth" => Self::BrandAuth,
            "/brand-signup" => Self::BrandSignup,
            "/brand-price" => Self::BrandPrice,
            "/UserApplyCampaign" => Self::UserApplyCampaign,
            "/profile" => Self::Profile,
            "/admin/auth" => Self::AdminAuth,
            "/admin" => Self::AdminDashboard,
            "/admin/campaigns" => Self::AdminCampaigns,
            "/brand" | "/brand/dashboard" => Self::BrandDashboard,
            _ => {
                if let Some(rest) = path.strip_prefix("/admin/") {
                    Self::AdminSection(rest.to_string())
                } else if let Some(rest) = path.strip_prefix("/brand/") {
                    Self::BrandSection(rest.to_string())
                } else {
                    Self::NotFound
                }
            }
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Campaigns => "/campaigns".to_string(),
            Self::Mall => "/mall".to_string(),
            Self::SignIn => "/signin".to_string(),
            Self::SignUp => "/signup".to_string(),
            Self::BrandAuth => "/brand-auth".to_string(),
            Self::BrandSignup => "/brand-signup".to_string(),
            Self::BrandPrice => "/brand-price".to_string(),
            Self::UserApplyCampaign => "/UserApplyCampaign".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::AdminAuth => "/admin/auth".to_string(),
            Self::AdminDashboard => "/admin".to_string(),
            Self::AdminCampaigns => "/admin/campaigns".to_string(),
            Self::AdminSection(rest) => format!("/admin/{}", rest),
            Self::BrandDashboard => "/brand/dashboard".to_string(),
            Self::BrandSection(rest) => format!("/brand/{}", rest),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由由哪个守卫保护**
    pub fn guard(&self) -> Option<TokenKind> {
        match self {
            Self::UserApplyCampaign | Self::Profile => Some(TokenKind::User),
            Self::AdminDashboard | Self::AdminCampaigns | Self::AdminSection(_) => {
                Some(TokenKind::Admin)
            }
            Self::BrandDashboard | Self::BrandSection(_) => Some(TokenKind::Brand),
            _ => None,
        }
    }

    pub fn zone(&self) -> RouteZone {
        RouteZone::classify(&self.to_path())
    }

    /// 当前路由使用的外框
    pub fn chrome(&self) -> Chrome {
        match self {
            // 登录页本身不显示侧边栏
            Self::AdminAuth => Chrome::Bare,
            _ => Chrome::for_zone(self.zone()),
        }
    }

    /// 各认证域的登录页（守卫失败时的重定向目标）
    pub fn sign_in_for(kind: TokenKind) -> Self {
        match kind {
            TokenKind::User => Self::SignIn,
            TokenKind::Admin => Self::AdminAuth,
            TokenKind::Brand => Self::BrandAuth,
        }
    }

    /// 各认证域登录成功后的落地页
    pub fn home_for(kind: TokenKind) -> Self {
        match kind {
            TokenKind::User => Self::Home,
            TokenKind::Admin => Self::AdminDashboard,
            TokenKind::Brand => Self::BrandDashboard,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_static_route_back_to_itself() {
        let routes = [
            AppRoute::Home,
            AppRoute::Campaigns,
            AppRoute::Mall,
            AppRoute::SignIn,
            AppRoute::SignUp,
            AppRoute::BrandAuth,
            AppRoute::BrandSignup,
            AppRoute::BrandPrice,
            AppRoute::UserApplyCampaign,
            AppRoute::Profile,
            AppRoute::AdminAuth,
            AppRoute::AdminDashboard,
            AppRoute::AdminCampaigns,
            AppRoute::BrandDashboard,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn nested_sections_and_trailing_slashes() {
        assert_eq!(
            AppRoute::from_path("/admin/recommendations/settings"),
            AppRoute::AdminSection("recommendations/settings".to_string())
        );
        assert_eq!(
            AppRoute::from_path("/brand/campaigns/42/"),
            AppRoute::BrandSection("campaigns/42".to_string())
        );
        assert_eq!(AppRoute::from_path("/campaigns/"), AppRoute::Campaigns);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/nowhere"), AppRoute::NotFound);
    }

    #[test]
    fn guards_by_route() {
        assert_eq!(
            AppRoute::from_path("/UserApplyCampaign").guard(),
            Some(TokenKind::User)
        );
        assert_eq!(
            AppRoute::from_path("/admin/campaigns").guard(),
            Some(TokenKind::Admin)
        );
        assert_eq!(
            AppRoute::from_path("/brand/dashboard").guard(),
            Some(TokenKind::Brand)
        );
        assert_eq!(AppRoute::AdminAuth.guard(), None);
        assert_eq!(AppRoute::BrandAuth.guard(), None);
        assert_eq!(AppRoute::Campaigns.guard(), None);
    }

    #[test]
    fn sign_in_targets() {
        assert_eq!(AppRoute::sign_in_for(TokenKind::User).to_path(), "/signin");
        assert_eq!(AppRoute::sign_in_for(TokenKind::Admin).to_path(), "/admin/auth");
        assert_eq!(AppRoute::sign_in_for(TokenKind::Brand).to_path(), "/brand-auth");
    }

    #[test]
    fn chrome_by_route() {
        assert_eq!(AppRoute::Campaigns.chrome(), Chrome::PublicNav);
        assert_eq!(AppRoute::UserApplyCampaign.chrome(), Chrome::PublicNav);
        assert_eq!(AppRoute::AdminCampaigns.chrome(), Chrome::AdminSidebar);
        assert_eq!(AppRoute::AdminAuth.chrome(), Chrome::Bare);
        assert_eq!(AppRoute::BrandDashboard.chrome(), Chrome::BrandSidebar);
        assert_eq!(AppRoute::BrandPrice.chrome(), Chrome::PublicNav);
    }
}
