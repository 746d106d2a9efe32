//! Upgrades command: which plan unlocks each feature

use anyhow::Result;
use colored::Colorize;
use wayfare_core::FeatureId;

use crate::context::AppContext;
use crate::output;
use crate::OutputFormat;

pub fn run(ctx: &AppContext, user: &str, features: &[String]) -> Result<()> {
    let ids: Vec<&str> = if features.is_empty() {
        FeatureId::ALL.iter().map(|f| f.as_str()).collect()
    } else {
        features.iter().map(|f| f.as_str()).collect()
    };

    let suggestions = ctx.service.upgrade_suggestions(user, &ids);

    if ctx.format == OutputFormat::Json {
        output::json::print(&output::json::JsonUpgrades {
            user,
            suggestions: &suggestions,
        });
        return Ok(());
    }

    let registry = ctx.registry();
    for id in &ids {
        let Some(s) = suggestions.get(*id) else {
            continue;
        };
        let label = s
            .feature
            .and_then(|f| registry.get(f))
            .map(|d| d.name.clone())
            .unwrap_or_else(|| id.to_string());

        let status = if s.has_access {
            "included".green().to_string()
        } else if s.feature.is_none() {
            "unknown feature".yellow().to_string()
        } else {
            match s.suggested_plan {
                Some(plan) => format!(
                    "upgrade to {}",
                    output::terminal::format_plan(plan, s.plan_info.as_ref())
                )
                .cyan()
                .to_string(),
                None => "not available on a higher plan".dimmed().to_string(),
            }
        };
        println!("  {:<24} {}", label, status);
    }
    Ok(())
}
