use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid upstream address: {0}")]
    InvalidUpstream(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Transport I/O failure with {server}: {reason}")]
    TransportIo { server: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Network-level failures that may succeed when retried against the same server.
    pub fn is_transient_io(&self) -> bool {
        matches!(
            self,
            DomainError::TransportConnectionRefused { .. }
                | DomainError::TransportConnectionReset { .. }
                | DomainError::TransportIo { .. }
                | DomainError::IoError(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DomainError::TransportTimeout { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionErrorKind {
    Timeout,
    AllUpstreamFailed,
    MalformedUpstreamResponse,
    Overloaded,
}

impl ResolutionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionErrorKind::Timeout => "timeout",
            ResolutionErrorKind::AllUpstreamFailed => "all_upstream_failed",
            ResolutionErrorKind::MalformedUpstreamResponse => "malformed_upstream_response",
            ResolutionErrorKind::Overloaded => "overloaded",
        }
    }
}

/// Failure modes of a network resolution. A malformed reply is
/// endpoint-local: it degrades that endpoint and the pool moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Resolution deadline exceeded")]
    Timeout,

    #[error("All {attempted} upstream servers failed")]
    AllUpstreamFailed { attempted: usize },

    #[error("Malformed response from {server}: {reason}")]
    MalformedUpstreamResponse { server: String, reason: String },

    #[error("Too many concurrent resolutions (limit {limit})")]
    Overloaded { limit: usize },
}

impl ResolutionError {
    pub fn kind(&self) -> ResolutionErrorKind {
        match self {
            ResolutionError::Timeout => ResolutionErrorKind::Timeout,
            ResolutionError::AllUpstreamFailed { .. } => ResolutionErrorKind::AllUpstreamFailed,
            ResolutionError::MalformedUpstreamResponse { .. } => {
                ResolutionErrorKind::MalformedUpstreamResponse
            }
            ResolutionError::Overloaded { .. } => ResolutionErrorKind::Overloaded,
        }
    }
}
