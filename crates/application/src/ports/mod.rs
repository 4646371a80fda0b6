mod cache_maintenance_port;
mod config_reload_port;
mod dns_solver;
mod static_record_registry;
mod upstream_resolver;
mod upstream_transport;

pub use cache_maintenance_port::{CacheMaintenancePort, CacheSweepOutcome};
pub use config_reload_port::ConfigReloadPort;
pub use dns_solver::DnsSolver;
pub use static_record_registry::StaticRecordRegistry;
pub use upstream_resolver::{UpstreamResolver, UpstreamStatus};
pub use upstream_transport::UpstreamTransport;

// Re-export for convenience
pub use dps_domain::{Answer, DnsQuery};
