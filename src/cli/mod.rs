//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod cache;
pub mod context;
pub mod init;
pub mod nav;
pub mod org;
pub mod page;
pub mod status;

pub use args::OutputFormat;
pub use context::CommandContext;

/// polarop - command-line companion for the Polar platform
#[derive(Parser, Debug)]
#[command(name = "polarop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "POLAROP_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "POLAROP_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "POLAROP_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Keep cached reads in memory only, skipping the on-disk cache
    #[arg(long, global = true, env = "POLAROP_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Ignore cached reads and fetch fresh data from the API
    #[arg(long, global = true, env = "POLAROP_REFRESH", hide_env = true)]
    pub refresh: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize polarop configuration
    Init,

    /// Show authentication and configuration status
    Status,

    /// Display version information
    Version,

    /// Inspect and manage organizations
    #[command(subcommand)]
    Org(OrgCommands),

    /// Load an organization's public page
    #[command(after_help = "EXAMPLES:\n  \
            polarop page acme                      # Profile as served on polar.sh\n  \
            polarop page acme --host fund.acme.dev # As requested on a custom domain\n  \
            polarop page acme --metadata           # Title, Open Graph and Twitter card")]
    Page {
        /// Organization name
        org: String,

        /// Host the page is requested on (canonical redirect check)
        #[arg(long)]
        host: Option<String>,

        /// Only show page metadata
        #[arg(long, conflicts_with = "host")]
        metadata: bool,
    },

    /// Show the Polar menu for an organization's public page
    Menu {
        /// Organization whose page is being viewed
        #[arg(long)]
        org: String,

        /// Current path, used as the post-login return target
        #[arg(long)]
        path: Option<String>,

        /// Pending payment intent to carry through sign-up
        #[arg(long = "payment-intent")]
        payment_intent: Option<String>,
    },

    /// Show dashboard navigation for the current path
    Nav {
        /// Organization in context (defaults to your personal organization)
        #[arg(long)]
        org: Option<String>,

        /// Current dashboard path
        #[arg(long)]
        path: String,
    },

    /// Manage local response cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Organization subcommands
#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// List organizations you can see
    #[command(visible_alias = "ls")]
    List {
        /// Only organizations you administer
        #[arg(long)]
        admin: bool,
    },

    /// Look an organization up by name
    Get {
        /// Organization name (GitHub login)
        #[arg(required_unless_present = "id")]
        name: Option<String>,

        /// Look up by organization ID instead of name
        #[arg(long, conflicts_with = "name")]
        id: Option<String>,
    },

    /// List organization members
    Members {
        /// Organization ID
        id: String,
    },

    /// Re-sync members from GitHub
    SyncMembers {
        /// Organization ID
        id: String,
    },

    /// Update organization settings
    #[command(after_help = "EXAMPLES:\n  \
            polarop org update <id> --pledge-minimum 2000\n  \
            polarop org update <id> --show-amount false --billing-email billing@acme.dev\n  \
            polarop org update <id> --upfront-split 50")]
    Update {
        /// Organization ID
        id: String,

        /// Minimum pledge amount, in cents
        #[arg(long = "pledge-minimum")]
        pledge_minimum: Option<i64>,

        /// Show the pledged amount on badges
        #[arg(long = "show-amount", value_name = "BOOL")]
        show_amount: Option<bool>,

        /// Billing email address
        #[arg(long = "billing-email")]
        billing_email: Option<String>,

        /// Default share of rewards to contributors, in percent
        #[arg(long = "upfront-split", value_parser = clap::value_parser!(i64).range(0..=100))]
        upfront_split: Option<i64>,

        /// Default custom badge message
        #[arg(long = "badge-message")]
        badge_message: Option<String>,
    },

    /// Show badge settings
    Badge {
        /// Organization ID
        id: String,
    },

    /// Change badge settings
    BadgeSet {
        /// Organization ID
        id: String,

        /// Show the pledged amount on badges
        #[arg(long = "show-amount", value_name = "BOOL")]
        show_amount: Option<bool>,

        /// Minimum amount, in cents
        #[arg(long = "minimum-amount")]
        minimum_amount: Option<i64>,

        /// Badge message
        #[arg(long)]
        message: Option<String>,
    },

    /// Show prepaid credit balance
    Credits {
        /// Organization ID
        id: String,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,
    /// Clear all cached data
    Clear,
    /// Print cache directory path
    Path,
}
