//! Auth command: manage the billing API token

use anyhow::Result;
use colored::Colorize;
use wayfare_core::config::BackendKind;
use wayfare_core::SubscriptionSource;

use crate::{context, token, Cli};

const SIGN_IN_URL: &str = "https://wayfare.travel/account/tokens?cli=true";

/// Runs `wayfare auth` with the given action.
///
/// - No args, no --token: same as `login`
/// - `--token <TOKEN>`: save the token and probe the billing API
/// - `status`: show where the token comes from
/// - `logout`: remove the stored token
pub fn run(action: Option<&AuthAction>, new_token: Option<&str>, cli: &Cli) -> Result<()> {
    if let Some(t) = new_token {
        return run_set_token(t, cli);
    }

    match action {
        Some(AuthAction::Status) => run_status(),
        Some(AuthAction::Logout) => run_logout(),
        Some(AuthAction::Login) | None => run_browser(),
    }
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum AuthAction {
    /// Open the sign-in page to create a token
    Login,
    /// Show the current token source
    Status,
    /// Remove the stored token
    Logout,
}

fn run_browser() -> Result<()> {
    eprintln!("{}", "  Opening browser to sign in...".bold());
    eprintln!();

    if let Err(e) = open::that(SIGN_IN_URL) {
        eprintln!("  {} Could not open browser: {}", "Error:".red().bold(), e);
        eprintln!();
        eprintln!(
            "  Visit {} to create an API token, then run:",
            "https://wayfare.travel/account/tokens".bold()
        );
        eprintln!("    {}", "wayfare auth --token <TOKEN>".bold());
        return Ok(());
    }

    eprintln!("  After signing in, copy your API token and run:");
    eprintln!("    {}", "wayfare auth --token <TOKEN>".bold());
    eprintln!();

    Ok(())
}

fn run_set_token(new_token: &str, cli: &Cli) -> Result<()> {
    eprint!("  Saving token... ");
    token::save_token(new_token)?;
    eprintln!("{}", "done".green());

    // Probe only makes sense against the real API.
    let config = match context::load_config(cli) {
        Ok(config) if config.backend.kind == BackendKind::Http => config,
        _ => return Ok(()),
    };

    eprint!("  Checking billing API... ");
    let source = config.build_source(Some(new_token.trim().to_string()))?;
    match source.subscription("me") {
        Ok(_) => eprintln!("{}", "ok".green()),
        Err(e) => {
            eprintln!("{}", "failed".yellow());
            eprintln!("  Token saved, but the API check failed: {}", e.to_string().dimmed());
        }
    }
    Ok(())
}

fn run_status() -> Result<()> {
    if let Ok(t) = std::env::var(token::TOKEN_ENV) {
        if !t.trim().is_empty() {
            eprintln!(
                "  {}: {} (from {})",
                "Token".bold(),
                token::mask(t.trim()).cyan(),
                token::TOKEN_ENV
            );
            return Ok(());
        }
    }
    match token::load_token() {
        Some(t) => eprintln!(
            "  {}: {} (saved)",
            "Token".bold(),
            token::mask(&t).cyan()
        ),
        None => eprintln!(
            "  {}: none. Run '{}' to sign in.",
            "Token".bold(),
            "wayfare auth".bold()
        ),
    }
    Ok(())
}

fn run_logout() -> Result<()> {
    token::remove_token()?;
    eprintln!("  {} Token removed.", "\u{2713}".green());
    Ok(())
}
