pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use bytes::Bytes;
use dps_application::ports::UpstreamTransport;
use dps_domain::{DnsProtocol, DomainError, UpstreamEndpoint};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use super::wire::HEADER_LEN;

/// Plain-DNS transport over the network. One socket per exchange.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkTransport;

impl NetworkTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UpstreamTransport for NetworkTransport {
    async fn send(
        &self,
        message: &[u8],
        endpoint: &UpstreamEndpoint,
        timeout: Duration,
    ) -> Result<Bytes, DomainError> {
        let deadline = tokio::time::Instant::now() + timeout;
        let exchange = async {
            match endpoint.protocol {
                DnsProtocol::Udp => udp::exchange(endpoint.addr, message).await,
                DnsProtocol::Tcp => tcp::exchange(endpoint.addr, message).await,
            }
        };

        let bytes = tokio::time::timeout_at(deadline, exchange)
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: endpoint.to_string(),
            })??;

        if bytes.len() < HEADER_LEN {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{} replied with {} bytes, shorter than a DNS header",
                endpoint,
                bytes.len()
            )));
        }

        Ok(Bytes::from(bytes))
    }
}

pub(crate) fn map_io_error(server: SocketAddr, e: io::Error) -> DomainError {
    let server = server.to_string();
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
            DomainError::TransportConnectionReset { server }
        }
        io::ErrorKind::TimedOut => DomainError::TransportTimeout { server },
        _ => DomainError::TransportIo {
            server,
            reason: e.to_string(),
        },
    }
}
