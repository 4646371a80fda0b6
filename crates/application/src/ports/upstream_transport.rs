use async_trait::async_trait;
use bytes::Bytes;
use dps_domain::{DomainError, UpstreamEndpoint};
use std::time::Duration;

/// Sends one encoded DNS message to an upstream and returns the raw reply.
///
/// Errors must be classified: `TransportTimeout` when `timeout` elapses,
/// a transport I/O variant for socket failures and `InvalidDnsResponse`
/// when the peer replies with something that is not a DNS message.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    async fn send(
        &self,
        message: &[u8],
        endpoint: &UpstreamEndpoint,
        timeout: Duration,
    ) -> Result<Bytes, DomainError>;
}
