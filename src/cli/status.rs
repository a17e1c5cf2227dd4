//! Status command implementation

use colored::Colorize;

use crate::cache::CacheStorage;
use crate::cli::args::GlobalOptions;
use crate::config::{API_HOST_ENV, Config, TOKEN_ENV};
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "polarop Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;

    match Config::load_at(opts.config_ref()) {
        Ok(file_config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            println!();

            let config = file_config.clone().with_env_overrides();

            if file_config.token.is_some() {
                println!("{} Access token configured", "✓".green());
            } else if config.token.is_some() {
                println!("{} Access token from {}", "✓".green(), TOKEN_ENV);
            } else {
                println!("{} Access token not configured", "✗".red());
                println!("  → Run 'polarop init' to configure");
            }

            print_hosts(&config);
            println!(
                "{} Cached reads stay fresh for {}s",
                "○".dimmed(),
                config.preferences.stale_secs
            );
        }
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!(
                "  Public pages still work anonymously. Run {} to add a token.",
                "polarop init".cyan()
            );
            print_hosts(&Config::default().with_env_overrides());
        }
    }

    if opts.no_cache {
        println!("{} On-disk cache disabled", "○".dimmed());
    } else if let Ok(dir) = CacheStorage::cache_dir() {
        println!("{} Cache: {}", "○".dimmed(), dir.display());
    }

    println!();
    Ok(())
}

fn print_hosts(config: &Config) {
    let api_host = config.api_host();
    if std::env::var(API_HOST_ENV).is_ok_and(|h| !h.is_empty()) {
        println!("{} API host: {} (from {})", "○".dimmed(), api_host.cyan(), API_HOST_ENV);
    } else {
        println!("{} API host: {}", "○".dimmed(), api_host.cyan());
    }
    println!("{} Frontend: {}", "○".dimmed(), config.frontend_url().cyan());
}
