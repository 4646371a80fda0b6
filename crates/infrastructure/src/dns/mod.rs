pub mod cache;
pub mod cache_maintenance;
pub mod forwarding;
pub mod load_balancer;
pub mod record_store;
pub mod resolver;
pub mod server;
pub mod transport;
pub mod wire;
pub mod wire_response;

pub use cache::{CacheKey, CacheMetrics, CacheMetricsSnapshot, ResponseCache};
pub use cache_maintenance::ResponseCacheMaintenance;
pub use load_balancer::{HealthTracker, UpstreamPolicy, UpstreamPool};
pub use record_store::RecordStore;
pub use resolver::{EngineReloader, Solver, SolverSettings};
pub use server::DnsServerHandler;
pub use transport::NetworkTransport;
