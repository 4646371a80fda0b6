use async_trait::async_trait;
use dps_domain::{Answer, DnsQuery, EndpointHealth, ResolutionError, UpstreamEndpoint};
use tokio::time::Instant;

/// Snapshot of one upstream's advisory health.
#[derive(Debug, Clone)]
pub struct UpstreamStatus {
    pub endpoint: UpstreamEndpoint,
    pub health: EndpointHealth,
}

/// Resolution over the network with failover across upstreams.
#[async_trait]
pub trait UpstreamResolver: Send + Sync {
    async fn resolve(&self, query: &DnsQuery, deadline: Instant) -> Result<Answer, ResolutionError>;

    fn upstream_status(&self) -> Vec<UpstreamStatus>;
}
