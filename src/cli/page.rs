//! Public page command implementation

use std::sync::Arc;

use colored::Colorize;
use serde_json::json;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::output::format_cents;
use crate::output::json::print_json;
use crate::output::table::format_fields;
use crate::page::{PageLoader, PageMetadata, PageOutcome, PageView};

/// Run the page command
pub async fn run(opts: &GlobalOptions, org: &str, host: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let loader = PageLoader::new(Arc::clone(&ctx.client), ctx.config.frontend_url());

    let view = match loader.load(org, host).await {
        PageOutcome::Redirect(url) => {
            match ctx.format {
                OutputFormat::Json => print_json(&json!({ "redirect": url }))?,
                _ => println!("{} Page moved to {}", "→".yellow(), url.cyan()),
            }
            return Ok(());
        }
        outcome => outcome.into_view()?,
    };

    match ctx.format {
        OutputFormat::Json | OutputFormat::Table => print_json(&view)?,
        OutputFormat::Pretty => print_view(&view)?,
    }
    Ok(())
}

/// Run the page command with `--metadata`
pub async fn metadata(opts: &GlobalOptions, org: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let loader = PageLoader::new(Arc::clone(&ctx.client), ctx.config.frontend_url());

    let meta = loader
        .metadata(org)
        .await?
        .ok_or_else(|| Error::Other(format!("Page not found: {}", org)))?;

    match ctx.format {
        OutputFormat::Json | OutputFormat::Table => print_json(&meta)?,
        OutputFormat::Pretty => print_metadata(&meta),
    }
    Ok(())
}

fn print_view(view: &PageView) -> Result<()> {
    let org = &view.organization;

    println!();
    println!("{}", org.display_name().bold());
    if let Some(bio) = org.bio.as_deref().filter(|b| !b.is_empty()) {
        println!("{}", bio.dimmed());
    }

    section("Posts", view.posts.len());
    for post in &view.posts {
        let pin = if post.is_pinned { " (pinned)" } else { "" };
        println!("  • {}{}", post.title, pin.dimmed());
    }

    section("Repositories", view.repositories.len());
    for repo in &view.repositories {
        println!("  • {} ★ {}", repo.name, repo.stars.unwrap_or(0));
    }

    section("Subscription tiers", view.subscription_tiers.items.len());
    for tier in &view.subscription_tiers.items {
        println!(
            "  • {} {}/mo",
            tier.name,
            format_cents(tier.price_amount, &tier.price_currency)
        );
    }

    let subscribers = view.subscriptions_summary.pagination.total_count;
    if subscribers > 0 {
        let names: Vec<&str> = view
            .subscriptions_summary
            .items
            .iter()
            .map(|s| s.user.username.as_str())
            .collect();
        println!();
        println!(
            "{} {} ({})",
            "Subscribers:".bold(),
            subscribers.to_string().cyan(),
            names.join(", ")
        );
    }

    section("Funded issues", view.issues.len());
    for funding in &view.issues {
        println!(
            "  • #{} {} {}",
            funding.issue.number,
            funding.issue.title,
            format_cents(funding.total.amount, &funding.total.currency).green()
        );
    }

    if !view.admin_organizations.is_empty() {
        let names: Vec<&str> = view
            .admin_organizations
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        println!();
        println!("{} {}", "Signed in, administering:".dimmed(), names.join(", "));
    }

    println!();
    print_metadata(&view.metadata);
    println!();
    println!("{}", "JSON-LD".bold());
    println!("{}", view.json_ld.to_json()?);
    Ok(())
}

fn section(title: &str, count: usize) {
    println!();
    println!("{} ({}):", title.bold(), count.to_string().cyan());
    if count == 0 {
        println!("  {}", "(none)".dimmed());
    }
}

fn print_metadata(meta: &PageMetadata) {
    println!("{}", "Metadata".bold());
    let mut fields = vec![
        ("Title", meta.title.clone()),
        ("Description", meta.description.clone()),
        ("Twitter card", meta.twitter.card.to_string()),
    ];
    if let Some(image) = meta.open_graph.images.first() {
        fields.push((
            "Image",
            format!("{} ({}x{})", image.url, image.width, image.height),
        ));
    }
    for alternate in &meta.alternates {
        fields.push(("Feed", format!("{} [{}]", alternate.url, alternate.media_type)));
    }
    println!("{}", format_fields(&fields));
}
