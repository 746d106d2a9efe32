//! Wayfare CLI - subscription entitlement inspector

use anyhow::Result;
use clap::Parser;

use wayfare_cli::{commands, context, logging, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init and auth must work without a readable config.
    match cli.command {
        Commands::Init { ref path } => {
            logging::init(None, cli.verbose);
            return commands::init::run(path.as_deref());
        }
        Commands::Auth {
            ref action,
            ref token,
        } => {
            logging::init(None, cli.verbose);
            return commands::auth::run(action.as_ref(), token.as_deref(), &cli);
        }
        _ => {}
    }

    let config = context::load_config(&cli)?;
    logging::init(Some(&config.logging), cli.verbose);
    let ctx = context::AppContext::new(config, &cli)?;

    match cli.command {
        Commands::Check {
            ref user,
            ref feature,
            require,
        } => commands::check::run(&ctx, user, feature, require),
        Commands::Features { ref user } => commands::features::run(&ctx, user),
        Commands::Upgrades {
            ref user,
            ref features,
        } => commands::upgrades::run(&ctx, user, features),
        Commands::Plans => commands::plans::run(&ctx),
        Commands::Init { .. } | Commands::Auth { .. } => Ok(()),
    }
}
