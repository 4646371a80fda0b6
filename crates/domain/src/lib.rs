//! DNS Proxy Server domain layer
pub mod answer;
pub mod config;
pub mod container;
pub mod dns_protocol;
pub mod dns_query;
pub mod dns_record;
pub mod dns_request;
pub mod errors;

pub use answer::{Answer, AnswerOutcome, AnswerPayload, AnswerSource};
pub use config::{CacheConfig, CliOverrides, Config, ConfigError, DnsConfig, LocalDnsRecord};
pub use container::{ContainerInfo, ContainerNetwork};
pub use dns_protocol::{DnsProtocol, EndpointHealth, UpstreamEndpoint};
pub use dns_query::{normalize_domain, DnsQuery};
pub use dns_record::{RecordData, RecordOrigin, RecordType, StaticRecord};
pub use dns_request::DnsRequest;
pub use errors::{DomainError, ResolutionError, ResolutionErrorKind};
