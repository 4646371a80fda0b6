use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use crate::dns_record::StaticRecord;

const LOCAL_CONFIG_PATH: &str = "dns-proxy-server.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dns-proxy-server/config.toml";

pub const ENV_UPSTREAM_SERVERS: &str = "DPS_UPSTREAM_SERVERS";
pub const ENV_DNS_PORT: &str = "DPS_DNS_PORT";
pub const ENV_BIND_ADDRESS: &str = "DPS_BIND_ADDRESS";
pub const ENV_CONTAINER_DOMAIN: &str = "DPS_CONTAINER_DOMAIN";
pub const ENV_LOG_LEVEL: &str = "DPS_LOG_LEVEL";

/// Main configuration structure for the DNS proxy server
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Resolution configuration (upstreams, timeouts, local records)
    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-proxy-server.toml in current directory
    /// 3. /etc/dns-proxy-server/config.toml
    /// 4. Default configuration
    ///
    /// `DPS_*` environment variables then override the file, and command-line
    /// flags override both.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overrides settings from `DPS_*` variables as returned by `lookup`.
    /// Blank values are ignored. `DPS_UPSTREAM_SERVERS` is a comma-separated
    /// list that replaces the configured one.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(servers) = var(ENV_UPSTREAM_SERVERS) {
            self.dns.upstream_servers = servers
                .split(',')
                .map(str::trim)
                .filter(|server| !server.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(port) = var(ENV_DNS_PORT) {
            self.server.dns_port = port
                .parse()
                .map_err(|_| ConfigError::Env(ENV_DNS_PORT.to_string(), port.clone()))?;
        }
        if let Some(bind) = var(ENV_BIND_ADDRESS) {
            self.server.bind_address = bind;
        }
        if let Some(domain) = var(ENV_CONTAINER_DOMAIN) {
            self.dns.container_domain = domain;
        }
        if let Some(level) = var(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        Ok(())
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.dns.upstream_servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }
        self.dns
            .upstream_endpoints()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.dns.query_timeout_ms == 0 || self.dns.attempt_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Query and attempt timeouts must be greater than 0".to_string(),
            ));
        }
        if self.dns.attempt_timeout_ms > self.dns.query_timeout_ms {
            return Err(ConfigError::Validation(format!(
                "attempt_timeout_ms ({}) cannot exceed query_timeout_ms ({})",
                self.dns.attempt_timeout_ms, self.dns.query_timeout_ms
            )));
        }
        if self.dns.max_inflight == 0 {
            return Err(ConfigError::Validation(
                "max_inflight must be greater than 0".to_string(),
            ));
        }

        if self.cache.min_ttl > self.cache.max_ttl {
            return Err(ConfigError::Validation(format!(
                "cache min_ttl ({}) cannot exceed max_ttl ({})",
                self.cache.min_ttl, self.cache.max_ttl
            )));
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Validation(
                "cache max_entries must be greater than 0".to_string(),
            ));
        }

        self.static_records()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if !self.logging.is_valid_level() {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Local records from the file, converted to CONFIG-origin static records.
    pub fn static_records(&self) -> Result<Vec<StaticRecord>, crate::DomainError> {
        self.dns
            .local_records
            .iter()
            .map(|record| record.to_static_record(&self.dns.local_domain))
            .collect()
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|path| std::path::Path::new(path).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}
