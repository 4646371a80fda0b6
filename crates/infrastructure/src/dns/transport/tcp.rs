//! TCP Transport for DNS queries (RFC 1035 §4.2.2), two-byte length framing.

use super::map_io_error;
use dps_domain::DomainError;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

pub async fn exchange(server_addr: SocketAddr, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
    let mut stream = TcpStream::connect(server_addr)
        .await
        .map_err(|e| map_io_error(server_addr, e))?;

    stream
        .set_nodelay(true)
        .map_err(|e| map_io_error(server_addr, e))?;

    send_with_length_prefix(&mut stream, message_bytes)
        .await
        .map_err(|e| map_io_error(server_addr, e))?;

    debug!(
        server = %server_addr,
        message_len = message_bytes.len(),
        "TCP query sent"
    );

    let response_bytes = read_with_length_prefix(&mut stream)
        .await
        .map_err(|e| map_io_error(server_addr, e))?;

    debug!(
        server = %server_addr,
        response_len = response_bytes.len(),
        "TCP response received"
    );

    Ok(response_bytes)
}

pub async fn send_with_length_prefix<S>(stream: &mut S, message_bytes: &[u8]) -> std::io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    if message_bytes.len() > MAX_TCP_MESSAGE_SIZE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("DNS message too large: {} bytes", message_bytes.len()),
        ));
    }

    let length_bytes = (message_bytes.len() as u16).to_be_bytes();
    stream.write_all(&length_bytes).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub async fn read_with_length_prefix<S>(stream: &mut S) -> std::io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await?;

    Ok(response)
}
