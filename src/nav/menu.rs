//! Polar menu shown on public organization pages

use reqwest::Url;
use serde::Serialize;

use crate::client::models::{Organization, UserRead};
use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Where visitors return to after login when no path is known
pub const DEFAULT_RETURN_TO: &str = "/feed";

/// Base URLs the menu links point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuUrls {
    pub frontend_url: String,
    pub api_host: String,
}

impl From<&Config> for MenuUrls {
    fn from(config: &Config) -> Self {
        Self {
            frontend_url: config.frontend_url(),
            api_host: config.api_host(),
        }
    }
}

/// Inputs the menu is derived from.
#[derive(Debug, Clone, Copy)]
pub struct MenuContext<'a> {
    pub user: Option<&'a UserRead>,
    pub admin_organizations: &'a [Organization],
    /// Organization whose page is being viewed
    pub organization: &'a Organization,
    pub path: Option<&'a str>,
    pub payment_intent_id: Option<&'a str>,
}

/// What the menu renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MenuState {
    /// Sign-up call to action plus a login link
    Anonymous { signup_url: String, login_url: String },
    /// Profile dropdown only
    AuthenticatedNoAdmin { user: UserRead },
    /// Profile dropdown plus a creator dashboard shortcut
    AuthenticatedAdmin {
        user: UserRead,
        creator_dashboard_url: String,
    },
}

impl MenuState {
    pub fn derive(urls: &MenuUrls, ctx: &MenuContext<'_>) -> Result<Self> {
        let return_to = ctx
            .path
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_RETURN_TO);

        let Some(user) = ctx.user else {
            return Ok(MenuState::Anonymous {
                signup_url: signup_url(urls, return_to, ctx.payment_intent_id)?,
                login_url: login_url(urls, return_to, ctx.organization)?,
            });
        };

        match creator_dashboard_url(urls, user, ctx.admin_organizations) {
            Some(url) => Ok(MenuState::AuthenticatedAdmin {
                user: user.clone(),
                creator_dashboard_url: url,
            }),
            None => Ok(MenuState::AuthenticatedNoAdmin { user: user.clone() }),
        }
    }
}

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| ConfigError::Invalid(format!("Invalid URL '{}': {}", url, e)).into())
}

/// Creator dashboard of the user's personal organization when they have
/// one, otherwise of their first administered organization.
pub fn creator_dashboard_url(
    urls: &MenuUrls,
    user: &UserRead,
    admin_organizations: &[Organization],
) -> Option<String> {
    let first = admin_organizations.first()?;
    let name = if admin_organizations.iter().any(|o| o.is_personal) {
        user.username.as_str()
    } else {
        first.name.as_str()
    };
    Some(format!(
        "{}/maintainer/{}/overview",
        urls.frontend_url.trim_end_matches('/'),
        name
    ))
}

/// Login on the main frontend. Pages on a custom domain forward the
/// session back by passing their organization id.
pub fn login_url(urls: &MenuUrls, return_to: &str, organization: &Organization) -> Result<String> {
    let mut url = parse(&format!("{}/login", urls.frontend_url.trim_end_matches('/')))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("return_to", return_to);
        if organization
            .custom_domain
            .as_deref()
            .is_some_and(|d| !d.is_empty())
        {
            query.append_pair("for_organization_id", &organization.id);
        }
    }
    Ok(url.into())
}

/// GitHub sign-up through the API's authorize endpoint.
pub fn signup_url(
    urls: &MenuUrls,
    return_to: &str,
    payment_intent_id: Option<&str>,
) -> Result<String> {
    let mut url = parse(&format!(
        "{}/api/v1/integrations/github/authorize",
        urls.api_host.trim_end_matches('/')
    ))?;
    {
        let mut query = url.query_pairs_mut();
        if let Some(intent) = payment_intent_id.filter(|i| !i.is_empty()) {
            query.append_pair("payment_intent_id", intent);
        }
        query.append_pair("return_to", return_to);
    }
    Ok(url.into())
}
