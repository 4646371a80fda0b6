#![allow(dead_code)]

use async_trait::async_trait;
use dps_application::ports::{CacheMaintenancePort, CacheSweepOutcome};
use dps_domain::DomainError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub struct MockCacheMaintenancePort {
    sweep_call_count: AtomicU64,
    should_fail: AtomicBool,
    entries_removed: usize,
}

impl MockCacheMaintenancePort {
    pub fn new() -> Self {
        Self {
            sweep_call_count: AtomicU64::new(0),
            should_fail: AtomicBool::new(false),
            entries_removed: 0,
        }
    }

    pub fn removing(mut self, entries: usize) -> Self {
        self.entries_removed = entries;
        self
    }

    pub fn sweep_call_count(&self) -> u64 {
        self.sweep_call_count.load(Ordering::Relaxed)
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl CacheMaintenancePort for MockCacheMaintenancePort {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        self.sweep_call_count.fetch_add(1, Ordering::Relaxed);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(DomainError::IoError("mock sweep failure".into()));
        }
        Ok(CacheSweepOutcome {
            entries_removed: self.entries_removed,
            cache_size: 10,
        })
    }
}
