pub mod cache;
pub mod dns;
pub mod errors;
pub mod local_records;
pub mod logging;
pub mod root;
pub mod server;

pub use cache::CacheConfig;
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use local_records::LocalDnsRecord;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
