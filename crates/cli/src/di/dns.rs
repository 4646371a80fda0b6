use dps_application::ports::{CacheMaintenancePort, UpstreamTransport};
use dps_application::use_cases::{HandleDnsQueryUseCase, ReloadConfigUseCase};
use dps_domain::Config;
use dps_infrastructure::dns::{
    DnsServerHandler, EngineReloader, NetworkTransport, RecordStore, ResponseCache,
    ResponseCacheMaintenance, Solver, SolverSettings, UpstreamPool,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct DnsServices {
    pub records: Arc<RecordStore>,
    pub cache: Arc<ResponseCache>,
    pub solver: Arc<Solver>,
    pub handler: Arc<DnsServerHandler>,
    pub reload_config: Arc<ReloadConfigUseCase>,
    pub cache_maintenance: Arc<dyn CacheMaintenancePort>,
}

impl DnsServices {
    pub fn new(config: &Config, shared_config: Arc<RwLock<Config>>) -> anyhow::Result<Self> {
        info!("Initializing DNS services");

        let records = Arc::new(RecordStore::with_records(config.static_records()?));
        let cache = Arc::new(ResponseCache::new(config.cache.max_entries));

        let transport: Arc<dyn UpstreamTransport> = Arc::new(NetworkTransport::new());
        let pool = Arc::new(UpstreamPool::from_config(config, transport.clone())?);

        let solver = Arc::new(Solver::new(
            SolverSettings::from_config(config),
            pool,
            records.clone(),
            cache.clone(),
        ));

        let use_case = Arc::new(HandleDnsQueryUseCase::new(
            solver.clone(),
            config.dns.query_timeout(),
        ));
        let handler = Arc::new(DnsServerHandler::new(use_case));

        let reloader = Arc::new(EngineReloader::new(solver.clone(), transport));
        let reload_config = Arc::new(ReloadConfigUseCase::new(shared_config, reloader));

        let cache_maintenance: Arc<dyn CacheMaintenancePort> =
            Arc::new(ResponseCacheMaintenance::new(cache.clone()));

        info!(
            upstreams = config.dns.upstream_servers.len(),
            static_records = records.len(),
            "DNS services initialized"
        );

        Ok(Self {
            records,
            cache,
            solver,
            handler,
            reload_config,
            cache_maintenance,
        })
    }
}
