//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). If the response has the TC
//! (truncated) bit set, the caller should retry via TCP.

use super::map_io_error;
use dps_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub async fn exchange(server_addr: SocketAddr, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
    let bind_addr: SocketAddr = if server_addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| map_io_error(server_addr, e))?;

    // Connected so ICMP port-unreachable surfaces as ConnectionRefused.
    socket
        .connect(server_addr)
        .await
        .map_err(|e| map_io_error(server_addr, e))?;

    let bytes_sent = socket
        .send(message_bytes)
        .await
        .map_err(|e| map_io_error(server_addr, e))?;

    debug!(server = %server_addr, bytes_sent = bytes_sent, "UDP query sent");

    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    let bytes_received = socket
        .recv(&mut recv_buf)
        .await
        .map_err(|e| map_io_error(server_addr, e))?;
    recv_buf.truncate(bytes_received);

    debug!(
        server = %server_addr,
        bytes_received = bytes_received,
        "UDP response received"
    );

    Ok(recv_buf)
}
