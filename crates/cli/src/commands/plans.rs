//! Plans command: hierarchy, prices and unlocked features

use anyhow::Result;
use colored::Colorize;

use crate::context::AppContext;
use crate::output;
use crate::OutputFormat;

pub fn run(ctx: &AppContext) -> Result<()> {
    let registry = ctx.registry();

    if ctx.format == OutputFormat::Json {
        output::json::print(&registry.to_file());
        return Ok(());
    }

    for plan in registry.hierarchy().iter() {
        println!(
            "  {}",
            output::terminal::format_plan(plan, registry.plan_info(plan)).bold()
        );
        let names: Vec<&str> = registry.unlocked_by(plan).map(|d| d.name.as_str()).collect();
        if names.is_empty() {
            println!("    {}", "no premium features".dimmed());
        } else {
            println!("    {}", names.join(", ").dimmed());
        }
    }
    Ok(())
}
