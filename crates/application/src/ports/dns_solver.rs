use async_trait::async_trait;
use dps_domain::{Answer, DnsQuery};
use tokio::time::Instant;

/// Entry point of the resolution engine. Never fails: failures are carried
/// inside the returned [`Answer`].
#[async_trait]
pub trait DnsSolver: Send + Sync {
    async fn solve(&self, query: &DnsQuery) -> Answer;

    /// Like [`DnsSolver::solve`] but gives up waiting at `deadline`. Giving up
    /// only affects this caller; a shared upstream resolution keeps running.
    async fn solve_until(&self, query: &DnsQuery, deadline: Instant) -> Answer;
}
