//! Initialize .wayfare.toml configuration

use anyhow::Result;
use std::path::Path;
use wayfare_core::config::CONFIG_FILENAME;
use wayfare_core::WayfareConfig;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(CONFIG_FILENAME);

    if config_path.exists() {
        println!("⚠️  {} already exists at {:?}", CONFIG_FILENAME, config_path);
        return Ok(());
    }

    let config = WayfareConfig::default();
    config.save(&config_path)?;

    println!("✅ Created {} at {:?}", CONFIG_FILENAME, config_path);
    println!("\nAdd [[subscriptions]] fixtures or point [backend] at the billing API, then run:");
    println!("  wayfare check <user> <feature>");

    Ok(())
}
