//! Shared state for commands that answer entitlement questions

use anyhow::Result;
use std::sync::Arc;
use wayfare_core::{
    EntitlementService, FeatureRegistry, RestrictMode, SubscriptionSource, WayfareConfig,
};

use crate::{token, Cli, OutputFormat};

/// Loads `--config` if given, otherwise searches upwards from the working directory.
pub fn load_config(cli: &Cli) -> Result<WayfareConfig> {
    match cli.config {
        Some(ref path) => WayfareConfig::from_file(path),
        None => WayfareConfig::find_and_load(&std::env::current_dir()?),
    }
}

pub struct AppContext {
    pub config: WayfareConfig,
    pub service: EntitlementService<Box<dyn SubscriptionSource>>,
    pub format: OutputFormat,
    pub restrict_mode: RestrictMode,
}

impl AppContext {
    pub fn new(config: WayfareConfig, cli: &Cli) -> Result<Self> {
        let registry = Arc::new(config.load_registry()?);
        let source = config.build_source(token::resolve_token())?;
        let service = EntitlementService::new(registry, source).with_cache(config.build_cache());
        tracing::debug!(
            backend = ?config.backend.kind,
            cache_ttl_secs = config.cache.ttl_secs,
            features = service.resolver().registry().len(),
            "entitlement service ready"
        );

        let restrict_mode = cli
            .restrict_mode
            .map(RestrictMode::from)
            .unwrap_or(config.gate.restrict_mode);

        Ok(Self {
            format: cli.format.unwrap_or(OutputFormat::Terminal),
            restrict_mode,
            config,
            service,
        })
    }

    pub fn registry(&self) -> &FeatureRegistry {
        self.service.resolver().registry()
    }
}
