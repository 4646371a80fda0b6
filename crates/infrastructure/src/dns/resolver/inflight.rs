use crate::dns::cache::CacheKey;
use dashmap::DashMap;
use dps_domain::Answer;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

type FlightSender = Arc<watch::Sender<Option<Answer>>>;
pub type FlightReceiver = watch::Receiver<Option<Answer>>;

/// Outcome of asking to resolve a key.
pub enum Join {
    /// No flight existed; the caller owns the new one and must finish it.
    Leader(FlightGuard, FlightReceiver),
    /// A flight is already running; wait on its result.
    Follower(FlightReceiver),
    /// The registry is full and the key had no flight to join.
    Shed { limit: usize },
}

/// Keys with an upstream resolution in progress.
pub struct InflightRegistry {
    flights: DashMap<CacheKey, FlightSender, FxBuildHasher>,
    active: AtomicUsize,
    limit: AtomicUsize,
}

impl InflightRegistry {
    pub fn new(limit: usize) -> Self {
        Self {
            flights: DashMap::with_hasher(FxBuildHasher),
            active: AtomicUsize::new(0),
            limit: AtomicUsize::new(limit.max(1)),
        }
    }

    pub fn join_or_lead(self: &Arc<Self>, key: &CacheKey) -> Join {
        match self.flights.entry(key.clone()) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                Join::Follower(rx)
            }
            dashmap::Entry::Vacant(e) => {
                let limit = self.limit.load(Ordering::Relaxed);
                let admitted = self
                    .active
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                        (n < limit).then_some(n + 1)
                    })
                    .is_ok();
                if !admitted {
                    return Join::Shed { limit };
                }

                let (tx, rx) = watch::channel(None::<Answer>);
                let tx = Arc::new(tx);
                e.insert(Arc::clone(&tx));
                Join::Leader(
                    FlightGuard {
                        registry: Arc::clone(self),
                        key: key.clone(),
                        tx,
                        finished: false,
                    },
                    rx,
                )
            }
        }
    }

    /// Distinct keys currently being resolved.
    pub fn len(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.flights.contains_key(key)
    }

    pub fn limit(&self) -> usize {
        self.limit.load(Ordering::Relaxed)
    }

    pub fn set_limit(&self, limit: usize) {
        self.limit.store(limit.max(1), Ordering::Relaxed);
    }

    /// Removes the flight only if it is still the one `tx` belongs to.
    fn release(&self, key: &CacheKey, tx: &FlightSender) -> bool {
        let removed = self
            .flights
            .remove_if(key, |_, current| Arc::ptr_eq(current, tx))
            .is_some();
        if removed {
            self.active.fetch_sub(1, Ordering::AcqRel);
        }
        removed
    }
}

/// Ownership of one flight. Dropping it without [`FlightGuard::complete`]
/// (panic, cancellation) still releases the key; waiters then see the
/// channel close.
pub struct FlightGuard {
    registry: Arc<InflightRegistry>,
    key: CacheKey,
    tx: FlightSender,
    finished: bool,
}

impl FlightGuard {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Releases the key, then publishes `answer` to every waiter.
    pub fn complete(mut self, answer: Answer) {
        self.finished = true;
        self.registry.release(&self.key, &self.tx);
        let _ = self.tx.send(Some(answer));
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if !self.finished && self.registry.release(&self.key, &self.tx) {
            debug!(key = %self.key, "In-flight resolution abandoned");
        }
    }
}
