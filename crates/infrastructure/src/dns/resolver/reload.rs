use super::settings::SolverSettings;
use super::solver::Solver;
use crate::dns::load_balancer::UpstreamPool;
use dps_application::ports::{ConfigReloadPort, UpstreamTransport};
use dps_domain::{Config, DomainError};
use std::sync::Arc;
use tracing::info;

/// Applies a reloaded configuration to the running engine.
pub struct EngineReloader {
    solver: Arc<Solver>,
    transport: Arc<dyn UpstreamTransport>,
}

impl EngineReloader {
    pub fn new(solver: Arc<Solver>, transport: Arc<dyn UpstreamTransport>) -> Self {
        Self { solver, transport }
    }
}

impl ConfigReloadPort for EngineReloader {
    fn apply(&self, config: &Config) -> Result<(), DomainError> {
        let records = config.static_records()?;
        let pool = UpstreamPool::from_config(config, Arc::clone(&self.transport))?;
        let settings = SolverSettings::from_config(config);

        self.solver.reload(settings, Arc::new(pool));
        self.solver.records().replace_configured(records);

        let cache = self.solver.cache();
        cache.set_max_entries(config.cache.max_entries);
        cache.clear();

        info!(
            upstreams = config.dns.upstream_servers.len(),
            static_records = config.dns.local_records.len(),
            max_inflight = config.dns.max_inflight,
            "Resolution engine reloaded"
        );
        Ok(())
    }
}
