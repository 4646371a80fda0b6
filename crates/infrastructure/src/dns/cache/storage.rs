use super::key::CacheKey;
use super::metrics::{CacheMetrics, CacheMetricsSnapshot};
use dashmap::DashMap;
use dps_domain::{Answer, AnswerSource, DnsQuery};
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tokio::time::Instant;
use tracing::{debug, info};

/// Entries inspected per slot freed at capacity.
const EVICTION_SAMPLE_SIZE: usize = 8;
/// A full cache frees `max_entries / EVICTION_BATCH_DIVISOR` slots at once.
const EVICTION_BATCH_DIVISOR: usize = 100;
const MAX_EVICTION_BATCH: usize = 1_024;

struct CacheEntry {
    answer: Answer,
    expires_at: Instant,
}

impl CacheEntry {
    #[inline]
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// TTL-bounded store of upstream answers keyed by (name, type).
///
/// Expired entries are never returned: they are dropped lazily on read and
/// in bulk by [`ResponseCache::sweep`].
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry, FxBuildHasher>,
    max_entries: AtomicUsize,
    metrics: CacheMetrics,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        info!(max_entries, "Response cache initialized");

        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            max_entries: AtomicUsize::new(max_entries.max(1)),
            metrics: CacheMetrics::default(),
        }
    }

    /// Returns a live answer tagged `source = Cache`, with its TTL reduced
    /// to the time left before expiry.
    pub fn get(&self, query: &DnsQuery) -> Option<Answer> {
        let key = CacheKey::from_query(query);
        let now = Instant::now();

        {
            let entry = match self.entries.get(&key) {
                Some(entry) => entry,
                None => {
                    self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
                    return None;
                }
            };

            if entry.is_live(now) {
                self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Some(Answer {
                    query: entry.answer.query.clone(),
                    outcome: entry.answer.outcome.clone(),
                    ttl: entry.expires_at - now,
                    source: AnswerSource::Cache,
                    obtained_at: now,
                });
            }
        }

        // The read guard must be released before touching the shard again.
        if self
            .entries
            .remove_if(&key, |_, entry| !entry.is_live(now))
            .is_some()
        {
            self.metrics.lazy_deletions.fetch_add(1, AtomicOrdering::Relaxed);
            debug!(key = %key, "Expired cache entry evicted on read");
        }
        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
        None
    }

    /// Stores `answer` for `query`, replacing any previous entry. Failed,
    /// static and zero-TTL answers are ignored. Returns whether it was stored.
    pub fn put(&self, query: &DnsQuery, answer: Answer) -> bool {
        if !answer.is_cacheable() {
            return false;
        }

        let now = Instant::now();
        let expires_at = answer.expires_at();
        if expires_at <= now {
            return false;
        }

        let key = CacheKey::from_query(query);
        if !self.entries.contains_key(&key) {
            self.make_room();
        }

        self.entries.insert(key, CacheEntry { answer, expires_at });
        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
        true
    }

    pub fn invalidate(&self, query: &DnsQuery) -> bool {
        let removed = self.entries.remove(&CacheKey::from_query(query)).is_some();
        if removed {
            self.metrics.invalidations.fetch_add(1, AtomicOrdering::Relaxed);
        }
        removed
    }

    pub fn clear(&self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.metrics
            .invalidations
            .fetch_add(removed as u64, AtomicOrdering::Relaxed);
        info!(removed, "Response cache cleared");
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0usize;

        self.entries.retain(|_, entry| {
            if entry.is_live(now) {
                true
            } else {
                removed += 1;
                false
            }
        });

        if removed > 0 {
            self.metrics
                .sweep_deletions
                .fetch_add(removed as u64, AtomicOrdering::Relaxed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries.load(AtomicOrdering::Relaxed)
    }

    pub fn set_max_entries(&self, max_entries: usize) {
        self.max_entries
            .store(max_entries.max(1), AtomicOrdering::Relaxed);
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.entries.len())
    }

    /// Frees at least one slot with bounded work: only the first
    /// `batch * EVICTION_SAMPLE_SIZE` entries of the map are inspected.
    fn make_room(&self) {
        let max_entries = self.max_entries();
        let len = self.entries.len();
        if len < max_entries {
            return;
        }

        let excess = len + 1 - max_entries;
        let batch = (max_entries / EVICTION_BATCH_DIVISOR)
            .clamp(1, MAX_EVICTION_BATCH)
            .max(excess);
        let removed = self.evict_batch(batch);
        debug!(removed, batch, "Cache full, entries evicted");
    }

    /// Drops every expired entry in the sample, then the live entries
    /// closest to expiry until `count` entries are gone.
    fn evict_batch(&self, count: usize) -> usize {
        let now = Instant::now();
        let budget = count.saturating_mul(EVICTION_SAMPLE_SIZE);

        let mut expired: Vec<CacheKey> = Vec::new();
        let mut live: Vec<(CacheKey, Instant)> = Vec::with_capacity(budget.min(self.entries.len()));
        for entry in self.entries.iter().take(budget) {
            if entry.value().is_live(now) {
                live.push((entry.key().clone(), entry.value().expires_at));
            } else {
                expired.push(entry.key().clone());
            }
        }
        // Shard read guards are released here, before any removal.

        let mut removed = 0usize;
        for key in expired {
            if self
                .entries
                .remove_if(&key, |_, entry| !entry.is_live(now))
                .is_some()
            {
                self.metrics.lazy_deletions.fetch_add(1, AtomicOrdering::Relaxed);
                removed += 1;
            }
        }

        live.sort_unstable_by_key(|(_, expires_at)| *expires_at);
        for (key, _) in live.into_iter().take(count.saturating_sub(removed)) {
            if self.entries.remove(&key).is_some() {
                self.metrics.evictions.fetch_add(1, AtomicOrdering::Relaxed);
                removed += 1;
            }
        }
        removed
    }
}
