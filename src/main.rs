//! polarop - command-line companion and client library for the Polar platform

use clap::Parser;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod nav;
mod output;
mod page;
mod queries;

use cli::args::GlobalOptions;
use cli::{CacheCommands, Cli, Commands, OrgCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("polarop version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Org(org_cmd) => match org_cmd {
            OrgCommands::List { admin } => cli::org::list(&opts, admin).await,
            OrgCommands::Get { name, id } => {
                cli::org::get(&opts, name.as_deref(), id.as_deref()).await
            }
            OrgCommands::Members { id } => cli::org::members(&opts, &id).await,
            OrgCommands::SyncMembers { id } => cli::org::sync_members(&opts, &id).await,
            OrgCommands::Update {
                id,
                pledge_minimum,
                show_amount,
                billing_email,
                upfront_split,
                badge_message,
            } => {
                let update = cli::org::build_update(
                    pledge_minimum,
                    show_amount,
                    billing_email,
                    upfront_split,
                    badge_message,
                );
                cli::org::update(&opts, &id, update).await
            }
            OrgCommands::Badge { id } => cli::org::badge(&opts, &id).await,
            OrgCommands::BadgeSet {
                id,
                show_amount,
                minimum_amount,
                message,
            } => cli::org::badge_set(&opts, &id, show_amount, minimum_amount, message).await,
            OrgCommands::Credits { id } => cli::org::credits(&opts, &id).await,
        },
        Commands::Page {
            org,
            host,
            metadata,
        } => {
            if metadata {
                cli::page::metadata(&opts, &org).await
            } else {
                cli::page::run(&opts, &org, host.as_deref()).await
            }
        }
        Commands::Menu {
            org,
            path,
            payment_intent,
        } => cli::nav::menu(&opts, &org, path.as_deref(), payment_intent.as_deref()).await,
        Commands::Nav { org, path } => cli::nav::nav(&opts, org.as_deref(), &path).await,
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status => cli::cache::status(opts.format),
            CacheCommands::Clear => cli::cache::clear(opts.format),
            CacheCommands::Path => cli::cache::path(),
        },
    }
}
