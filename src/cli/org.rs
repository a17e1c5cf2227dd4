//! Organization command implementations

use colored::Colorize;
use log::debug;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::{
    CreditBalance, Organization, OrganizationBadgeSettingsRead, OrganizationBadgeSettingsUpdate,
    OrganizationMember, OrganizationUpdate, Platforms,
};
use crate::error::{Error, Result};
use crate::output::{Formattable, format_cents};
use crate::output::json::print_json;
use crate::output::table::format_fields;
use crate::queries::org as queries;

/// Organization row for table display
#[derive(Debug, Tabled, Serialize)]
struct OrgRow {
    #[tabled(rename = "ORG ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "DISPLAY NAME")]
    display_name: String,
    #[tabled(rename = "PERSONAL")]
    is_personal: bool,
    #[tabled(rename = "CUSTOM DOMAIN")]
    custom_domain: String,
}

impl From<&Organization> for OrgRow {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id.clone(),
            name: org.name.clone(),
            display_name: org.display_name().to_string(),
            is_personal: org.is_personal,
            custom_domain: org.custom_domain.clone().unwrap_or_else(|| "--".to_string()),
        }
    }
}

/// Member row for table display
#[derive(Debug, Tabled, Serialize)]
struct MemberRow {
    #[tabled(rename = "USER ID")]
    user_id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "GITHUB")]
    github: String,
    #[tabled(rename = "ADMIN")]
    is_admin: bool,
}

impl From<OrganizationMember> for MemberRow {
    fn from(member: OrganizationMember) -> Self {
        Self {
            user_id: member.user_id,
            name: member.name,
            github: member.github_username.unwrap_or_else(|| "--".to_string()),
            is_admin: member.is_admin,
        }
    }
}

/// Run the org list command
pub async fn list(opts: &GlobalOptions, admin: bool) -> Result<()> {
    let ctx = CommandContext::authenticated(opts)?;

    let orgs = if admin {
        queries::list_admin_organizations(&ctx.queries, &ctx.client).await?
    } else {
        queries::list_all_organizations(&ctx.queries, &ctx.client, false).await?
    };
    debug!("Fetched {} organizations", orgs.items.len());

    let rows: Vec<OrgRow> = orgs.items.iter().map(OrgRow::from).collect();
    rows.print(ctx.format)
}

/// Run the org get command
pub async fn get(opts: &GlobalOptions, name: Option<&str>, id: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let org = match (id, name) {
        (Some(id), _) => queries::organization(&ctx.queries, &ctx.client, Some(id))
            .await?
            .ok_or_else(|| Error::Other("Organization ID must not be empty".to_string()))?,
        (None, Some(name)) => {
            queries::organization_lookup(&ctx.queries, &ctx.client, name, Platforms::Github)
                .await?
        }
        (None, None) => {
            return Err(Error::Other(
                "Pass an organization name or --id".to_string(),
            ));
        }
    };

    match ctx.format {
        OutputFormat::Json => print_json(&org)?,
        OutputFormat::Table => vec![OrgRow::from(&org)].print(ctx.format)?,
        OutputFormat::Pretty => print_org(&org),
    }
    Ok(())
}

fn print_org(org: &Organization) {
    println!("{}", org.display_name().bold());
    println!();

    let mut fields = vec![
        ("ID", org.id.clone()),
        ("Name", org.name.clone()),
        ("Platform", org.platform.to_string()),
        ("Personal", org.is_personal.to_string()),
        (
            "Minimum pledge",
            format_cents(org.pledge_minimum_amount, "usd"),
        ),
    ];
    let optional = [
        ("Bio", &org.bio),
        ("Blog", &org.blog),
        ("Twitter", &org.twitter_username),
        ("Custom domain", &org.custom_domain),
        ("Billing email", &org.billing_email),
    ];
    for (label, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            fields.push((label, value.to_string()));
        }
    }
    println!("{}", format_fields(&fields));
}

/// Run the org members command
pub async fn members(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::authenticated(opts)?;
    let members = queries::list_organization_members(&ctx.queries, &ctx.client, Some(id))
        .await?
        .unwrap_or_default();

    let rows: Vec<MemberRow> = members.items.into_iter().map(MemberRow::from).collect();
    rows.print(ctx.format)
}

/// Run the org sync-members command
pub async fn sync_members(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::authenticated(opts)?;
    queries::sync_organization_members(&ctx.queries, &ctx.client, id).await?;

    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "id": id, "synchronized": true }))?,
        _ => println!("{} Members of {} synchronized", "✓".green(), id),
    }
    Ok(())
}

/// Run the org update command
pub async fn update(opts: &GlobalOptions, id: &str, update: OrganizationUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(Error::Other(
            "Nothing to update. Pass at least one setting flag.".to_string(),
        ));
    }

    let ctx = CommandContext::authenticated(opts)?;
    let org = queries::update_organization(&ctx.queries, &ctx.client, id, &update).await?;

    match ctx.format {
        OutputFormat::Json => print_json(&org)?,
        OutputFormat::Table => vec![OrgRow::from(&org)].print(ctx.format)?,
        OutputFormat::Pretty => {
            println!("{} Updated {}", "✓".green(), org.name.bold());
            println!();
            print_org(&org);
        }
    }
    Ok(())
}

/// Build an update from the `org update` flags.
pub fn build_update(
    pledge_minimum: Option<i64>,
    show_amount: Option<bool>,
    billing_email: Option<String>,
    upfront_split: Option<i64>,
    badge_message: Option<String>,
) -> OrganizationUpdate {
    OrganizationUpdate {
        set_default_upfront_split_to_contributors: upfront_split.map(|_| true),
        default_upfront_split_to_contributors: upfront_split,
        pledge_badge_show_amount: show_amount,
        set_default_badge_custom_content: badge_message.as_ref().map(|_| true),
        default_badge_custom_content: badge_message,
        pledge_minimum_amount: pledge_minimum,
        billing_email,
    }
}

/// Run the org badge command
pub async fn badge(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::authenticated(opts)?;
    let settings = queries::organization_badge_settings(&ctx.queries, &ctx.client, id).await?;

    match ctx.format {
        OutputFormat::Json => print_json(&settings)?,
        _ => print_badge_settings(&settings),
    }
    Ok(())
}

fn print_badge_settings(settings: &OrganizationBadgeSettingsRead) {
    println!("{}", "Badge Settings".bold());
    println!();
    println!(
        "{}",
        format_fields(&[
            ("Show amount", settings.show_amount.to_string()),
            ("Minimum amount", format_cents(settings.minimum_amount, "usd")),
            ("Message", settings.message.clone().unwrap_or_else(|| "--".to_string())),
        ])
    );

    if !settings.repositories.is_empty() {
        println!();
        println!(
            "{} ({}):",
            "Repositories".bold(),
            settings.repositories.len().to_string().cyan()
        );
        for repo in &settings.repositories {
            let embed = if repo.badge_auto_embed { "auto-embed" } else { "manual" };
            println!(
                "  • {} [{}] {} open issues",
                repo.name,
                embed.dimmed(),
                repo.open_issues_count
            );
        }
    }
}

/// Run the org badge-set command
///
/// Unspecified values keep their current setting.
pub async fn badge_set(
    opts: &GlobalOptions,
    id: &str,
    show_amount: Option<bool>,
    minimum_amount: Option<i64>,
    message: Option<String>,
) -> Result<()> {
    if show_amount.is_none() && minimum_amount.is_none() && message.is_none() {
        return Err(Error::Other(
            "Nothing to update. Pass --show-amount, --minimum-amount or --message.".to_string(),
        ));
    }

    let ctx = CommandContext::authenticated(opts)?;
    let current = queries::organization_badge_settings(&ctx.queries, &ctx.client, id).await?;

    let mut settings = OrganizationBadgeSettingsUpdate::from(&current);
    if let Some(show) = show_amount {
        settings.show_amount = show;
    }
    if let Some(minimum) = minimum_amount {
        settings.minimum_amount = minimum;
    }
    if let Some(message) = message {
        settings.message = message;
    }

    let saved =
        queries::update_organization_badge_settings(&ctx.queries, &ctx.client, id, &settings)
            .await?;

    match ctx.format {
        OutputFormat::Json => print_json(&saved)?,
        _ => println!("{} Badge settings of {} updated", "✓".green(), id),
    }
    Ok(())
}

/// Run the org credits command
pub async fn credits(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::authenticated(opts)?;
    let balance = queries::organization_credits(&ctx.queries, &ctx.client, Some(id)).await?;

    match (ctx.format, balance) {
        (OutputFormat::Json, balance) => print_json(&balance)?,
        (_, Some(CreditBalance { amount })) => {
            println!("Credit balance: {}", format_cents(amount.amount, &amount.currency).bold());
        }
        (_, None) => println!("No credit balance"),
    }
    Ok(())
}
