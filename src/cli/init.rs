//! Init command implementation

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::client::{ClientConfig, PolarClient, UsersApi};
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Keeps any existing hosts and preferences and only replaces the token.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to polarop!".bold().green());
    println!("Let's set up your Polar configuration.\n");

    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();

    let token: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your Polar access token")
        .interact()?;

    println!("\n{}", "Verifying token...".cyan());
    let host = config.clone().with_env_overrides().api_host();
    let client = PolarClient::new(&ClientConfig::new(host).token(Some(token.clone())))?;
    let user = client.get_authenticated_user().await?;

    println!(
        "{} Authenticated as {}",
        "✓".green(),
        user.username.bold()
    );

    config.token = Some(token);
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "polarop status".cyan());
    println!("  {} - List your organizations", "polarop org list --admin".cyan());

    Ok(())
}
