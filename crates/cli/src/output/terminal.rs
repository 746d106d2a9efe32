//! Terminal output formatting

use colored::Colorize;
use wayfare_core::{AccessResult, FeatureRegistry, GateView, Plan, PlanInfo};

pub fn format_price(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

pub fn format_plan(plan: Plan, info: Option<&PlanInfo>) -> String {
    match info {
        Some(info) => format!(
            "{} ({}, {} / {} days)",
            plan,
            info.name,
            format_price(info.price_cents),
            info.duration_days
        ),
        None => plan.to_string(),
    }
}

pub fn format_plan_set<'a>(plans: impl IntoIterator<Item = &'a Plan>) -> String {
    let names: Vec<&str> = plans.into_iter().map(|p| p.as_str()).collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Human-readable feature label, falling back to the raw id.
pub fn feature_label(registry: &FeatureRegistry, result: &AccessResult, raw: &str) -> String {
    result
        .feature
        .and_then(|id| registry.get(id))
        .map(|d| d.name.clone())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_access(registry: &FeatureRegistry, result: &AccessResult, raw: &str) -> Vec<String> {
    let label = feature_label(registry, result, raw);
    let mut lines = Vec::new();

    if result.has_access {
        lines.push(format!("  {} {} {}", "\u{2713}".green(), label.bold(), "granted".green()));
    } else {
        let reason = result
            .denial
            .map(|r| r.to_string())
            .unwrap_or_else(|| "denied".to_string());
        lines.push(format!(
            "  {} {} {} ({})",
            "\u{2717}".red(),
            label.bold(),
            "denied".red(),
            reason
        ));
    }

    let current = result
        .user_plan
        .map(|p| p.to_string())
        .unwrap_or_else(|| "none".to_string());
    lines.push(format!("    {}: {}", "Plan".bold(), current));
    lines.push(format!(
        "    {}: {}",
        "Unlocked by".bold(),
        format_plan_set(&result.required_plans)
    ));

    if let Some(plan) = result.upgrade_suggestion {
        lines.push(format!(
            "    {}: {}",
            "Upgrade to".bold(),
            format_plan(plan, registry.plan_info(plan)).cyan()
        ));
    }
    lines
}

/// One line describing what the gate shows.
pub fn format_view(registry: &FeatureRegistry, view: &GateView<String>) -> String {
    match view {
        GateView::Loading => format!("  {}", "Loading...".dimmed()),
        GateView::Content(content) => format!("  {}", content),
        GateView::Hidden => format!("  {}", "(content hidden)".dimmed()),
        GateView::Blurred(overlay) | GateView::Locked(overlay) => {
            let name = registry
                .get(overlay.feature)
                .map(|d| d.name.as_str())
                .unwrap_or_else(|| overlay.feature.as_str());
            let icon = if matches!(view, GateView::Locked(_)) {
                "\u{1f512}"
            } else {
                "\u{2591}"
            };
            match overlay.upgrade {
                Some(plan) => format!(
                    "  {} {} is a premium feature. Upgrade to {} to unlock it.",
                    icon,
                    name.bold(),
                    plan.to_string().cyan()
                ),
                None => format!(
                    "  {} {} is not available on your plan.",
                    icon,
                    name.bold()
                ),
            }
        }
    }
}
