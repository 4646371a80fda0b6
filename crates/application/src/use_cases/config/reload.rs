use crate::ports::ConfigReloadPort;
use dps_domain::{Config, DomainError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct ReloadConfigUseCase {
    config: Arc<RwLock<Config>>,
    engine: Arc<dyn ConfigReloadPort>,
}

impl ReloadConfigUseCase {
    pub fn new(config: Arc<RwLock<Config>>, engine: Arc<dyn ConfigReloadPort>) -> Self {
        Self { config, engine }
    }

    /// Loads and validates `config_path`, then swaps it into the engine.
    /// On any error the running configuration is left untouched.
    pub async fn execute(&self, config_path: &str) -> Result<Config, DomainError> {
        let mut new_config = Config::load(Some(config_path), Default::default())
            .map_err(|e| DomainError::ConfigError(format!("Config load error: {}", e)))?;

        new_config
            .validate()
            .map_err(|e| DomainError::ConfigError(format!("Config validation error: {}", e)))?;

        let mut config = self.config.write().await;
        // Listener settings need a restart; keep the ones in use.
        new_config.server = config.server.clone();

        self.engine.apply(&new_config)?;
        *config = new_config.clone();

        info!(
            path = config_path,
            upstreams = new_config.dns.upstream_servers.len(),
            local_records = new_config.dns.local_records.len(),
            "Configuration reloaded"
        );

        Ok(new_config)
    }
}
