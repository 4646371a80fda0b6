mod logging;
mod signals;

pub use logging::init_logging;
pub use signals::wait_for_signals;

use dps_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    Ok(config)
}

pub fn log_config_summary(config: &Config) {
    info!(
        bind_address = %config.server.bind_address,
        dns_port = config.server.dns_port,
        upstreams = ?config.dns.upstream_servers,
        query_timeout_ms = config.dns.query_timeout_ms,
        attempt_timeout_ms = config.dns.attempt_timeout_ms,
        max_inflight = config.dns.max_inflight,
        cache_max_entries = config.cache.max_entries,
        local_records = config.dns.local_records.len(),
        "Configuration loaded"
    );
}
