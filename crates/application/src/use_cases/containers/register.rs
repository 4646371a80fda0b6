use crate::ports::StaticRecordRegistry;
use dps_domain::{normalize_domain, ContainerInfo, DomainError, RecordOrigin, StaticRecord};
use std::sync::Arc;
use tracing::{debug, info};

const CONTAINER_RECORD_TTL: u32 = 30;

/// Keeps the record store in sync with container start/stop events.
pub struct ContainerRecordsUseCase {
    registry: Arc<dyn StaticRecordRegistry>,
    container_domain: String,
}

impl ContainerRecordsUseCase {
    pub fn new(registry: Arc<dyn StaticRecordRegistry>, container_domain: impl Into<String>) -> Self {
        Self {
            registry,
            container_domain: container_domain.into(),
        }
    }

    /// Registers A/AAAA records for every hostname of `container`. Returns
    /// the number of records written.
    pub fn register(&self, container: &ContainerInfo) -> Result<usize, DomainError> {
        let ipv4 = container.best_ipv4();
        let ipv6 = container.best_ipv6();
        let hostnames = container.hostnames(&self.container_domain);

        let mut records = Vec::with_capacity(hostnames.len() * 2);
        for hostname in &hostnames {
            for ip in [ipv4, ipv6].into_iter().flatten() {
                records.push(StaticRecord::address(
                    hostname,
                    ip,
                    CONTAINER_RECORD_TTL,
                    RecordOrigin::Dynamic,
                )?);
            }
        }

        if records.is_empty() {
            debug!(container = %container.id, "Container has no address to publish");
            return Ok(0);
        }

        let count = records
            .into_iter()
            .filter_map(|record| self.registry.register(record).then_some(()))
            .count();

        info!(
            container = %container.id,
            hostnames = ?hostnames,
            ipv4 = ?ipv4,
            ipv6 = ?ipv6,
            "Container records registered"
        );
        Ok(count)
    }

    /// Drops every dynamic record published for `container`. Configured
    /// records under the same names are left alone.
    pub fn unregister(&self, container: &ContainerInfo) -> usize {
        let removed: usize = container
            .hostnames(&self.container_domain)
            .iter()
            .map(|hostname| {
                self.registry
                    .unregister_name(&normalize_domain(hostname), RecordOrigin::Dynamic)
            })
            .sum();

        info!(container = %container.id, removed, "Container records unregistered");
        removed
    }
}
