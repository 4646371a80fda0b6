use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::local_records::LocalDnsRecord;
use crate::dns_protocol::UpstreamEndpoint;
use crate::errors::DomainError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstream resolvers in priority order.
    #[serde(default = "default_upstream_servers")]
    pub upstream_servers: Vec<String>,

    /// Overall deadline for one resolution, in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Sub-timeout for a single attempt against one upstream.
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    /// Extra attempts against the same upstream after a transient I/O error.
    #[serde(default = "default_io_retries")]
    pub io_retries: u32,

    /// How long a failing upstream stays demoted.
    #[serde(default = "default_degraded_cooldown_secs")]
    pub degraded_cooldown_secs: u64,

    /// Cap on concurrently resolving names; new names past it are shed.
    #[serde(default = "default_max_inflight")]
    pub max_inflight: usize,

    /// Domain appended to container names, e.g. `web.docker`.
    #[serde(default = "default_container_domain")]
    pub container_domain: String,

    /// Domain appended to local records that do not set their own.
    #[serde(default)]
    pub local_domain: Option<String>,

    #[serde(default)]
    pub local_records: Vec<LocalDnsRecord>,
}

impl DnsConfig {
    pub fn upstream_endpoints(&self) -> Result<Vec<UpstreamEndpoint>, DomainError> {
        self.upstream_servers
            .iter()
            .enumerate()
            .map(|(order, server)| UpstreamEndpoint::parse(server, order))
            .collect()
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn degraded_cooldown(&self) -> Duration {
        Duration::from_secs(self.degraded_cooldown_secs)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream_servers: default_upstream_servers(),
            query_timeout_ms: default_query_timeout_ms(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            io_retries: default_io_retries(),
            degraded_cooldown_secs: default_degraded_cooldown_secs(),
            max_inflight: default_max_inflight(),
            container_domain: default_container_domain(),
            local_domain: None,
            local_records: vec![],
        }
    }
}

fn default_upstream_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_attempt_timeout_ms() -> u64 {
    500
}

fn default_io_retries() -> u32 {
    1
}

fn default_degraded_cooldown_secs() -> u64 {
    30
}

fn default_max_inflight() -> usize {
    10_000
}

fn default_container_domain() -> String {
    "docker".to_string()
}
