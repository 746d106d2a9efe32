//! Check command: run one entitlement check through an access gate

use anyhow::Result;
use std::convert::Infallible;
use std::time::Instant;
use wayfare_core::{AccessGate, AccessResult, FeatureId, GateView};

use super::CommandError;
use crate::context::AppContext;
use crate::output;
use crate::progress;
use crate::OutputFormat;

pub fn run(ctx: &AppContext, user: &str, feature: &str, require: bool) -> Result<()> {
    let gate = feature
        .parse::<FeatureId>()
        .ok()
        .map(|id| AccessGate::mount(id, ctx.restrict_mode));

    let spinner = match ctx.format {
        OutputFormat::Terminal => Some(progress::create_spinner(&format!(
            "Checking {} for {}...",
            feature, user
        ))),
        OutputFormat::Json => None,
    };
    let started = Instant::now();
    let result = ctx.service.check_feature_access(user, feature);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    tracing::debug!(
        user,
        feature,
        has_access = result.has_access,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "check finished"
    );

    let view = gate.map(|(mut gate, ticket)| {
        gate.resolve::<Infallible>(ticket, Ok(result.clone()));
        gate.render(unlocked_content(ctx, &result))
    });

    match ctx.format {
        OutputFormat::Terminal => print_terminal(ctx, user, feature, &result, view.as_ref()),
        OutputFormat::Json => output::json::print(&output::json::JsonCheck {
            user,
            result: &result,
            view: view.as_ref().map(output::json::JsonView::from_view),
        }),
    }

    if require && !result.has_access {
        return Err(CommandError::AccessDenied {
            feature: feature.to_string(),
            upgrade: result.upgrade_suggestion,
        }
        .into());
    }
    Ok(())
}

/// What a granted gate shows in the terminal.
fn unlocked_content(ctx: &AppContext, result: &AccessResult) -> String {
    let description = result
        .feature
        .and_then(|id| ctx.registry().get(id))
        .map(|d| d.description.clone())
        .unwrap_or_default();
    format!("\u{2728} {}", description)
}

fn print_terminal(
    ctx: &AppContext,
    user: &str,
    feature: &str,
    result: &AccessResult,
    view: Option<&GateView<String>>,
) {
    let registry = ctx.registry();
    println!("  User: {}", user);
    for line in output::terminal::format_access(registry, result, feature) {
        println!("{}", line);
    }
    if let Some(view) = view {
        println!();
        println!("{}", output::terminal::format_view(registry, view));
    }
}
