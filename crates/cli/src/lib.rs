//! Wayfare CLI library, exposed for integration tests

pub mod commands;
pub mod context;
pub mod logging;
pub mod output;
pub mod progress;
pub mod token;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wayfare")]
#[command(about = "Check which Wayfare premium features a subscriber can use", long_about = None)]
#[command(version = wayfare_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to .wayfare.toml (default: search upwards from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Override the gate's restrict mode: hide, blur, lock
    #[arg(long, value_enum, global = true)]
    pub restrict_mode: Option<RestrictModeArg>,

    /// Log entitlement decisions to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a user can access a feature
    Check {
        /// User id
        user: String,

        /// Feature id (e.g. offline_maps)
        feature: String,

        /// Exit with an error when access is denied
        #[arg(long)]
        require: bool,
    },

    /// List the features a user can access right now
    Features {
        /// User id
        user: String,
    },

    /// Suggest the plan that unlocks each feature
    Upgrades {
        /// User id
        user: String,

        /// Feature ids (default: every known feature)
        features: Vec<String>,
    },

    /// Show the plan hierarchy, prices and what each plan unlocks
    Plans,

    /// Initialize .wayfare.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Manage the billing API token
    Auth {
        #[command(subcommand)]
        action: Option<commands::auth::AuthAction>,

        /// Set the API token directly
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RestrictModeArg {
    Hide,
    Blur,
    Lock,
}

impl From<RestrictModeArg> for wayfare_core::RestrictMode {
    fn from(arg: RestrictModeArg) -> Self {
        match arg {
            RestrictModeArg::Hide => wayfare_core::RestrictMode::Hide,
            RestrictModeArg::Blur => wayfare_core::RestrictMode::Blur,
            RestrictModeArg::Lock => wayfare_core::RestrictMode::Lock,
        }
    }
}
