use super::inflight::{FlightGuard, FlightReceiver, InflightRegistry, Join};
use super::settings::SolverSettings;
use crate::dns::cache::{CacheKey, ResponseCache};
use crate::dns::record_store::RecordStore;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use dps_application::ports::{DnsSolver, UpstreamResolver};
use dps_domain::{Answer, DnsQuery, ResolutionError, ResolutionErrorKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Settings and upstream pool that one resolution runs against.
pub struct SolverState {
    pub settings: SolverSettings,
    pub upstream: Arc<dyn UpstreamResolver>,
    /// Bumped by every reload.
    pub generation: u64,
}

/// Answers a query from the record store, then the response cache, then the
/// upstream pool. Concurrent misses on one key share a single upstream
/// resolution.
pub struct Solver {
    state: ArcSwap<SolverState>,
    records: Arc<RecordStore>,
    cache: Arc<ResponseCache>,
    inflight: Arc<InflightRegistry>,
    generation: Arc<AtomicU64>,
}

impl Solver {
    pub fn new(
        settings: SolverSettings,
        upstream: Arc<dyn UpstreamResolver>,
        records: Arc<RecordStore>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        let inflight = Arc::new(InflightRegistry::new(settings.max_inflight));
        Self {
            state: ArcSwap::from_pointee(SolverState {
                settings,
                upstream,
                generation: 0,
            }),
            records,
            cache,
            inflight,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Swaps settings and upstream pool. Flights already running keep the
    /// state they started with but no longer write their answer to the cache.
    pub fn reload(&self, settings: SolverSettings, upstream: Arc<dyn UpstreamResolver>) {
        self.inflight.set_limit(settings.max_inflight);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.state.store(Arc::new(SolverState {
            settings,
            upstream,
            generation,
        }));
    }

    pub fn settings(&self) -> SolverSettings {
        self.state.load().settings.clone()
    }

    pub fn upstream(&self) -> Arc<dyn UpstreamResolver> {
        Arc::clone(&self.state.load().upstream)
    }

    pub fn records(&self) -> &Arc<RecordStore> {
        &self.records
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn inflight_count(&self) -> usize {
        self.inflight.len()
    }

    pub async fn solve(&self, query: &DnsQuery) -> Answer {
        self.resolve(query, None).await
    }

    pub async fn solve_until(&self, query: &DnsQuery, deadline: Instant) -> Answer {
        self.resolve(query, Some(deadline)).await
    }

    async fn resolve(&self, query: &DnsQuery, deadline: Option<Instant>) -> Answer {
        if let Some(record) = self.records.lookup_or_alias(query.domain(), query.record_type()) {
            debug!(
                domain = %query.domain(),
                record_type = %query.record_type(),
                "Static record HIT"
            );
            return Answer::from_static(query.clone(), record.data, record.ttl);
        }

        if let Some(cached) = self.cache.get(query) {
            debug!(
                domain = %query.domain(),
                record_type = %query.record_type(),
                "Cache HIT"
            );
            return cached;
        }

        let key = CacheKey::from_query(query);
        let rx = match self.inflight.join_or_lead(&key) {
            Join::Follower(rx) => {
                debug!(key = %key, "Joined in-flight resolution");
                rx
            }
            Join::Leader(guard, rx) => {
                // A flight may have finished between the cache read and the join.
                if let Some(cached) = self.cache.get(query) {
                    guard.complete(cached.clone());
                    return cached;
                }
                debug!(
                    domain = %query.domain(),
                    record_type = %query.record_type(),
                    "Cache MISS"
                );
                self.spawn_flight(query.clone(), guard);
                rx
            }
            Join::Shed { limit } => {
                let error = ResolutionError::Overloaded { limit };
                warn!(
                    domain = %query.domain(),
                    record_type = %query.record_type(),
                    error = %error,
                    "Query shed"
                );
                return Answer::failed(query.clone(), error.kind());
            }
        };

        self.await_flight(query, rx, deadline).await
    }

    fn spawn_flight(&self, query: DnsQuery, guard: FlightGuard) {
        let state = self.state.load_full();
        let cache = Arc::clone(&self.cache);
        let generation = Arc::clone(&self.generation);

        tokio::spawn(async move {
            let deadline = Instant::now() + state.settings.query_timeout;
            let resolution =
                tokio::time::timeout_at(deadline, state.upstream.resolve(&query, deadline)).await;

            let answer = match resolution {
                Ok(Ok(answer)) => {
                    let ttl = state.settings.clamp_ttl(answer.ttl);
                    let answer = answer.with_ttl(ttl);
                    let current = || generation.load(Ordering::Acquire) == state.generation;
                    if current() {
                        cache.put(&query, answer.clone());
                        // A reload between the check and the put may have
                        // cleared the cache before this entry landed.
                        if !current() {
                            cache.invalidate(&query);
                        }
                    } else {
                        debug!(
                            domain = %query.domain(),
                            record_type = %query.record_type(),
                            "Engine reloaded during resolution, answer not cached"
                        );
                    }
                    answer
                }
                Ok(Err(e)) => {
                    warn!(
                        domain = %query.domain(),
                        record_type = %query.record_type(),
                        error = %e,
                        "Upstream resolution failed"
                    );
                    Answer::failed(query, e.kind())
                }
                Err(_) => {
                    warn!(
                        domain = %query.domain(),
                        record_type = %query.record_type(),
                        timeout_ms = state.settings.query_timeout.as_millis() as u64,
                        "Upstream resolution timed out"
                    );
                    Answer::failed(query, ResolutionErrorKind::Timeout)
                }
            };

            guard.complete(answer);
        });
    }

    async fn await_flight(
        &self,
        query: &DnsQuery,
        mut rx: FlightReceiver,
        deadline: Option<Instant>,
    ) -> Answer {
        let wait = async move {
            match rx.wait_for(Option::is_some).await {
                Ok(value) => Option::clone(&value),
                Err(_) => None,
            }
        };

        let published = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, wait).await {
                Ok(published) => published,
                Err(_) => {
                    debug!(
                        domain = %query.domain(),
                        record_type = %query.record_type(),
                        "Caller deadline reached while waiting on resolution"
                    );
                    return Answer::failed(query.clone(), ResolutionErrorKind::Timeout);
                }
            },
            None => wait.await,
        };

        published.unwrap_or_else(|| {
            Answer::failed(query.clone(), ResolutionErrorKind::AllUpstreamFailed)
        })
    }
}

#[async_trait]
impl DnsSolver for Solver {
    async fn solve(&self, query: &DnsQuery) -> Answer {
        Solver::solve(self, query).await
    }

    async fn solve_until(&self, query: &DnsQuery, deadline: Instant) -> Answer {
        Solver::solve_until(self, query, deadline).await
    }
}
