pub mod config;
pub mod containers;
pub mod dns;

// Re-export use cases
pub use config::ReloadConfigUseCase;
pub use containers::ContainerRecordsUseCase;
pub use dns::{HandleDnsQueryUseCase, QueryStatsSnapshot};
