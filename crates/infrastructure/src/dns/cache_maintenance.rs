use super::cache::ResponseCache;

use async_trait::async_trait;
use dps_application::ports::{CacheMaintenancePort, CacheSweepOutcome};
use dps_domain::DomainError;
use std::sync::Arc;
use tracing::debug;

/// Infrastructure adapter implementing `CacheMaintenancePort`.
pub struct ResponseCacheMaintenance {
    cache: Arc<ResponseCache>,
}

impl ResponseCacheMaintenance {
    pub fn new(cache: Arc<ResponseCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CacheMaintenancePort for ResponseCacheMaintenance {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        let cache = Arc::clone(&self.cache);
        let removed = match tokio::task::spawn_blocking(move || cache.sweep()).await {
            Ok(count) => count,
            Err(e) => {
                debug!(error = %e, "Sweep task panicked");
                0
            }
        };

        Ok(CacheSweepOutcome {
            entries_removed: removed,
            cache_size: self.cache.len(),
        })
    }
}
