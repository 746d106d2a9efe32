//! Features command: list what a user can access

use anyhow::Result;
use colored::Colorize;

use crate::context::AppContext;
use crate::output;
use crate::OutputFormat;

pub fn run(ctx: &AppContext, user: &str) -> Result<()> {
    let features = ctx.service.accessible_features(user);

    match ctx.format {
        OutputFormat::Json => output::json::print(&output::json::JsonFeatures {
            user,
            features: &features,
        }),
        OutputFormat::Terminal => {
            if features.is_empty() {
                println!("  {} has no premium features.", user.bold());
                println!(
                    "  Run '{}' to see what each plan unlocks.",
                    "wayfare plans".bold()
                );
                return Ok(());
            }
            println!("  {} can use {} feature(s):", user.bold(), features.len());
            for def in &features {
                println!(
                    "    {} {:<24} {}",
                    "\u{2713}".green(),
                    def.name,
                    format!("[{}]", def.category).dimmed()
                );
            }
        }
    }
    Ok(())
}
