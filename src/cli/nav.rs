//! Menu and dashboard navigation commands

use colored::Colorize;
use log::warn;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::UsersApi;
use crate::client::models::{Organization, Platforms, UserRead};
use crate::error::{Error, Result};
use crate::nav::{MenuContext, MenuState, MenuUrls, NavItem, dashboard_navigation};
use crate::output::Formattable;
use crate::output::json::print_json;
use crate::queries::org as queries;

/// Dashboard route row for table display
#[derive(Debug, Tabled, Serialize)]
struct NavRow {
    #[tabled(rename = "ACTIVE")]
    active: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "LINK")]
    link: String,
    #[tabled(rename = "ICON")]
    icon: String,
}

impl From<NavItem> for NavRow {
    fn from(item: NavItem) -> Self {
        Self {
            active: if item.is_active { "*" } else { "" }.to_string(),
            title: item.title.to_string(),
            link: item.link,
            icon: item.icon.to_string(),
        }
    }
}

/// The signed-in user and the organizations they administer.
///
/// Anonymous without a token. An expired or revoked token also falls back
/// to anonymous, as does a failed admin-organizations read.
async fn viewer(ctx: &CommandContext) -> Result<(Option<UserRead>, Vec<Organization>)> {
    if !ctx.is_authenticated() {
        return Ok((None, Vec::new()));
    }

    let (user, admin) = futures::join!(
        ctx.client.get_authenticated_user(),
        queries::list_admin_organizations(&ctx.queries, &ctx.client),
    );

    let user = match user {
        Ok(user) => user,
        Err(Error::Api(e)) if e.is_auth() => {
            warn!("Token rejected, showing the anonymous menu: {}", e);
            return Ok((None, Vec::new()));
        }
        Err(e) => return Err(e),
    };

    let admin = match admin {
        Ok(list) => list.items,
        Err(e) => {
            warn!("Admin organizations unavailable, continuing without: {}", e);
            Vec::new()
        }
    };

    Ok((Some(user), admin))
}

/// Run the menu command
pub async fn menu(
    opts: &GlobalOptions,
    org: &str,
    path: Option<&str>,
    payment_intent: Option<&str>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let (organization, viewer) = futures::join!(
        queries::organization_lookup(&ctx.queries, &ctx.client, org, Platforms::Github),
        viewer(&ctx),
    );
    let organization = organization?;
    let (user, admin_organizations) = viewer?;

    let state = MenuState::derive(
        &MenuUrls::from(&ctx.config),
        &MenuContext {
            user: user.as_ref(),
            admin_organizations: &admin_organizations,
            organization: &organization,
            path,
            payment_intent_id: payment_intent,
        },
    )?;

    match ctx.format {
        OutputFormat::Json | OutputFormat::Table => print_json(&state)?,
        OutputFormat::Pretty => print_menu(&state),
    }
    Ok(())
}

fn print_menu(state: &MenuState) {
    match state {
        MenuState::Anonymous {
            signup_url,
            login_url,
        } => {
            println!("{}", "Not signed in".dimmed());
            println!("  Sign up with GitHub: {}", signup_url.cyan());
            println!("  Log in:              {}", login_url.cyan());
        }
        MenuState::AuthenticatedNoAdmin { user } => {
            println!("Signed in as {}", user.username.bold());
        }
        MenuState::AuthenticatedAdmin {
            user,
            creator_dashboard_url,
        } => {
            println!("Signed in as {}", user.username.bold());
            println!("  Creator dashboard: {}", creator_dashboard_url.cyan());
        }
    }
}

/// Run the nav command
pub async fn nav(opts: &GlobalOptions, org: Option<&str>, path: &str) -> Result<()> {
    let ctx = CommandContext::authenticated(opts)?;

    let admin_organizations = queries::list_admin_organizations(&ctx.queries, &ctx.client)
        .await?
        .items;
    let organization = match org {
        Some(name) => Some(
            queries::organization_lookup(&ctx.queries, &ctx.client, name, Platforms::Github)
                .await?,
        ),
        None => None,
    };

    let personal = admin_organizations.iter().find(|o| o.is_personal);
    let is_org_admin = organization
        .as_ref()
        .is_some_and(|o| admin_organizations.iter().any(|a| a.id == o.id));

    let items = dashboard_navigation(path, organization.as_ref(), personal, is_org_admin);

    match ctx.format {
        OutputFormat::Pretty => {
            if items.is_empty() {
                println!("{}", "No dashboard available".dimmed());
            }
            for item in &items {
                if item.is_active {
                    println!("{} {}  {}", "▸".green(), item.title.bold(), item.link.dimmed());
                } else {
                    println!("  {}  {}", item.title, item.link.dimmed());
                }
            }
        }
        format => {
            let rows: Vec<NavRow> = items.into_iter().map(NavRow::from).collect();
            rows.print(format)?;
        }
    }
    Ok(())
}
