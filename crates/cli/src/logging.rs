//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over `[logging].level`; `-v` / `-vv` force debug / trace.
//! Logs always go to stderr so JSON command output on stdout stays clean.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wayfare_core::config::LoggingConfig;

/// Environment switch for JSON log lines when no config is loaded.
pub const LOG_JSON_ENV: &str = "WAYFARE_LOG_JSON";

pub fn init(config: Option<&LoggingConfig>, verbose: u8) {
    let filter = build_filter(config, verbose);

    let json_logs = config.map(|c| c.json).unwrap_or(false)
        || std::env::var(LOG_JSON_ENV)
            .map(|v| v.parse::<bool>().unwrap_or(false))
            .unwrap_or(false);

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}

/// Filter directive for the given verbosity and config.
pub fn filter_directive(config: Option<&LoggingConfig>, verbose: u8) -> String {
    match verbose {
        0 => config
            .map(|c| c.level.clone())
            .unwrap_or_else(|| "warn".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn build_filter(config: Option<&LoggingConfig>, verbose: u8) -> EnvFilter {
    if verbose == 0 {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::try_new(filter_directive(config, verbose)).unwrap_or_else(|_| EnvFilter::new("warn"))
}
