use dps_domain::Config;
use std::time::Duration;

/// Immutable resolution settings. Replaced as a whole on reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverSettings {
    /// Overall budget of one upstream resolution, measured from its start.
    pub query_timeout: Duration,
    pub min_ttl: Duration,
    pub max_ttl: Duration,
    /// Distinct keys allowed in flight at once.
    pub max_inflight: usize,
}

impl SolverSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            query_timeout: config.dns.query_timeout(),
            min_ttl: Duration::from_secs(u64::from(config.cache.min_ttl)),
            max_ttl: Duration::from_secs(u64::from(config.cache.max_ttl)),
            max_inflight: config.dns.max_inflight,
        }
    }

    pub fn clamp_ttl(&self, ttl: Duration) -> Duration {
        ttl.clamp(self.min_ttl, self.max_ttl.max(self.min_ttl))
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
