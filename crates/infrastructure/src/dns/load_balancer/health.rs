use dashmap::DashMap;
use dps_domain::{EndpointHealth, UpstreamEndpoint};
use rustc_hash::FxBuildHasher;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct EndpointState {
    pub health: EndpointHealth,
    pub degraded_until: Option<Instant>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl Default for EndpointState {
    fn default() -> Self {
        Self {
            health: EndpointHealth::Up,
            degraded_until: None,
            consecutive_failures: 0,
            last_error: None,
        }
    }
}

impl EndpointState {
    /// Still inside the cooldown that followed its last failure.
    fn is_demoted(&self, now: Instant) -> bool {
        self.health == EndpointHealth::Degraded
            && self.degraded_until.is_some_and(|until| now < until)
    }
}

/// Advisory per-endpoint health. Never removes an endpoint from rotation,
/// only moves it behind the healthy ones while its cooldown runs.
pub struct HealthTracker {
    states: DashMap<usize, EndpointState, FxBuildHasher>,
    cooldown: Duration,
}

impl HealthTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            states: DashMap::with_hasher(FxBuildHasher),
            cooldown,
        }
    }

    /// Try order: endpoints not demoted by configured order, then demoted
    /// ones by configured order.
    pub fn ordered<'a>(&self, endpoints: &'a [UpstreamEndpoint]) -> Vec<&'a UpstreamEndpoint> {
        let now = Instant::now();
        let mut ordered: Vec<&UpstreamEndpoint> = endpoints.iter().collect();
        ordered.sort_by_key(|endpoint| (self.is_demoted(endpoint, now), endpoint.order));
        ordered
    }

    fn is_demoted(&self, endpoint: &UpstreamEndpoint, now: Instant) -> bool {
        self.states
            .get(&endpoint.order)
            .is_some_and(|state| state.is_demoted(now))
    }

    pub fn mark_degraded(&self, endpoint: &UpstreamEndpoint, error: &str) {
        let until = Instant::now() + self.cooldown;
        let mut state = self.states.entry(endpoint.order).or_default();
        state.health = EndpointHealth::Degraded;
        state.degraded_until = Some(until);
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        state.last_error = Some(error.to_string());

        warn!(
            server = %endpoint,
            failures = state.consecutive_failures,
            cooldown_secs = self.cooldown.as_secs(),
            error = %error,
            "Upstream degraded"
        );
    }

    pub fn mark_up(&self, endpoint: &UpstreamEndpoint) {
        let Some(mut state) = self.states.get_mut(&endpoint.order) else {
            return;
        };
        if state.health == EndpointHealth::Degraded {
            info!(
                server = %endpoint,
                failures = state.consecutive_failures,
                "Upstream recovered"
            );
        }
        *state = EndpointState::default();
    }

    pub fn health(&self, endpoint: &UpstreamEndpoint) -> EndpointHealth {
        self.states
            .get(&endpoint.order)
            .map_or(EndpointHealth::Up, |state| state.health)
    }

    pub fn state(&self, endpoint: &UpstreamEndpoint) -> EndpointState {
        self.states
            .get(&endpoint.order)
            .map(|state| state.clone())
            .unwrap_or_default()
    }
}
