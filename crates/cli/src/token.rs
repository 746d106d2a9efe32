//! API token storage (~/.config/wayfare/)

use anyhow::Result;
use std::path::{Path, PathBuf};

const TOKEN_FILENAME: &str = "token";

/// Environment override for the stored token.
pub const TOKEN_ENV: &str = "WAYFARE_TOKEN";

/// Returns `~/.config/wayfare/`, creating it if needed.
pub fn config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("wayfare");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok()?;
    }
    Some(dir)
}

/// Token to send to the billing API: `WAYFARE_TOKEN`, then the saved token.
pub fn resolve_token() -> Option<String> {
    std::env::var(TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(load_token)
}

/// Reads the stored token, trimmed.
pub fn load_token() -> Option<String> {
    load_token_in(&config_dir()?)
}

pub fn load_token_in(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join(TOKEN_FILENAME)).ok()?;
    let trimmed = content.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Saves a token to disk.
pub fn save_token(token: &str) -> Result<()> {
    let dir =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    save_token_in(&dir, token)
}

pub fn save_token_in(dir: &Path, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Token is empty");
    }
    std::fs::write(dir.join(TOKEN_FILENAME), token)?;
    Ok(())
}

/// Removes the stored token.
pub fn remove_token() -> Result<()> {
    if let Some(dir) = config_dir() {
        remove_token_in(&dir)?;
    }
    Ok(())
}

pub fn remove_token_in(dir: &Path) -> Result<()> {
    let _ = std::fs::remove_file(dir.join(TOKEN_FILENAME));
    Ok(())
}

/// Masks all but the last four characters for display.
pub fn mask(token: &str) -> String {
    let visible: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let hidden = token.chars().count().saturating_sub(4);
    format!("{}{}", "*".repeat(hidden), visible)
}
