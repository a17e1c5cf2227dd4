//! Dashboard navigation

use serde::Serialize;

use crate::client::models::Organization;

/// A dashboard route and whether the current viewer may see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub title: &'static str,
    pub link: String,
    pub icon: &'static str,
    pub visible: bool,
}

/// A visible route, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub link: String,
    pub icon: &'static str,
    pub is_active: bool,
}

/// All dashboard routes for `org`, visible or not.
pub fn dashboard_routes(
    org: &Organization,
    is_personal: bool,
    is_org_admin: bool,
) -> Vec<RouteDescriptor> {
    let base = format!("/maintainer/{}", org.name);

    vec![
        RouteDescriptor {
            title: "Overview",
            link: format!("{}/overview", base),
            icon: "space_dashboard",
            visible: true,
        },
        RouteDescriptor {
            title: "Issues",
            link: format!("{}/issues", base),
            icon: "bolt",
            visible: true,
        },
        RouteDescriptor {
            title: "Finance",
            link: format!("{}/finance", base),
            icon: "attach_money",
            visible: is_org_admin,
        },
        RouteDescriptor {
            title: "Members",
            link: format!("{}/members", base),
            icon: "group",
            visible: is_org_admin && !is_personal,
        },
        RouteDescriptor {
            title: "Settings",
            link: format!("{}/settings", base),
            icon: "tune",
            visible: is_org_admin,
        },
        RouteDescriptor {
            title: "Account",
            link: "/settings".to_string(),
            icon: "person",
            visible: is_personal,
        },
    ]
}

/// Visible routes for the current context, with the active one marked.
///
/// Without an organization in context the user's personal organization is
/// shown, as its owner.
pub fn dashboard_navigation(
    path: &str,
    org: Option<&Organization>,
    personal_org: Option<&Organization>,
    is_org_admin: bool,
) -> Vec<NavItem> {
    let routes = match (org, personal_org) {
        (Some(org), personal) => {
            let is_personal = personal.is_some_and(|p| p.id == org.id);
            dashboard_routes(org, is_personal, is_org_admin)
        }
        (None, Some(personal)) => dashboard_routes(personal, true, true),
        (None, None) => Vec::new(),
    };

    routes
        .into_iter()
        .filter(|r| r.visible)
        .map(|r| NavItem {
            is_active: path.starts_with(&r.link),
            title: r.title,
            link: r.link,
            icon: r.icon,
        })
        .collect()
}
