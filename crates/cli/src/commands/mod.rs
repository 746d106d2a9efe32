//! CLI commands

pub mod auth;
pub mod check;
pub mod features;
pub mod init;
pub mod plans;
pub mod upgrades;

use wayfare_core::Plan;

/// Failures that should end the process with a non-zero exit code.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("access to '{feature}' denied{}", upgrade_hint(.upgrade))]
    AccessDenied {
        feature: String,
        upgrade: Option<Plan>,
    },
}

fn upgrade_hint(upgrade: &Option<Plan>) -> String {
    match upgrade {
        Some(plan) => format!(" (upgrade to {plan})"),
        None => String::new(),
    }
}
