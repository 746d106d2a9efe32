//! Configuration file parsing for .wayfare.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{SubscriptionCache, DEFAULT_TTL_SECS};
use crate::feature::FeatureRegistry;
use crate::gate::RestrictMode;
use crate::source::{MemorySource, SubscriptionSource};
use crate::subscription::Subscription;

pub const CONFIG_FILENAME: &str = ".wayfare.toml";

/// Main configuration structure for .wayfare.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WayfareConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Fixture subscriptions served by the memory backend
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscriptions: Vec<Subscription>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Where subscriptions come from: "memory" or "http"
    #[serde(default)]
    pub kind: BackendKind,

    /// Billing API root, e.g. https://api.wayfare.travel/v1
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API token. Can also come from WAYFARE_TOKEN or `wayfare auth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Simulated lookup latency for the memory backend, in milliseconds
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a successful lookup stays cached (0 = disabled)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GateConfig {
    /// What denied content turns into: "hide", "blur" or "lock"
    #[serde(default)]
    pub restrict_mode: RestrictMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistryConfig {
    /// TOML registry replacing the builtin plan and feature tables.
    /// Relative paths resolve against the config file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable logs
    #[serde(default)]
    pub json: bool,
}

// Default functions
fn default_base_url() -> String {
    "https://api.wayfare.travel/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for WayfareConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            cache: CacheConfig::default(),
            gate: GateConfig::default(),
            registry: RegistryConfig::default(),
            logging: LoggingConfig::default(),
            subscriptions: Vec::new(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Memory,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
            simulated_latency_ms: 0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl WayfareConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let mut config: WayfareConfig = toml::from_str(&contents)
            .with_context(|| format!("parse config {}", path.display()))?;
        if let (Some(registry), Some(dir)) = (config.registry.path.as_mut(), path.parent()) {
            if registry.is_relative() {
                *registry = dir.join(&*registry);
            }
        }
        Ok(config)
    }

    /// Find and load .wayfare.toml from the current directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The configured registry file, or the builtin tables.
    pub fn load_registry(&self) -> Result<FeatureRegistry> {
        match self.registry.path {
            Some(ref path) => FeatureRegistry::from_file(path),
            None => Ok(FeatureRegistry::builtin()),
        }
    }

    pub fn build_cache(&self) -> SubscriptionCache {
        SubscriptionCache::new(Duration::from_secs(self.cache.ttl_secs))
    }

    /// Builds the configured subscription source.
    ///
    /// `token` overrides `backend.token` when present.
    pub fn build_source(&self, token: Option<String>) -> Result<Box<dyn SubscriptionSource>> {
        match self.backend.kind {
            BackendKind::Memory => {
                let mut source = MemorySource::from_subscriptions(self.subscriptions.clone());
                if self.backend.simulated_latency_ms > 0 {
                    source = source
                        .with_latency(Duration::from_millis(self.backend.simulated_latency_ms));
                }
                Ok(Box::new(source))
            }
            #[cfg(feature = "http-source")]
            BackendKind::Http => {
                let token = token.or_else(|| self.backend.token.clone());
                let source = crate::source::HttpSource::with_timeout(
                    self.backend.base_url.clone(),
                    token,
                    Duration::from_secs(self.backend.timeout_secs),
                )?;
                Ok(Box::new(source))
            }
            #[cfg(not(feature = "http-source"))]
            BackendKind::Http => {
                let _ = token;
                anyhow::bail!("http backend requires the `http-source` feature")
            }
        }
    }
}
