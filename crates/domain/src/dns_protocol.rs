use crate::errors::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

const DEFAULT_DNS_PORT: u16 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp,
    Tcp,
}

impl DnsProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsProtocol::Udp => "UDP",
            DnsProtocol::Tcp => "TCP",
        }
    }

    fn scheme(&self) -> &'static str {
        match self {
            DnsProtocol::Udp => "udp",
            DnsProtocol::Tcp => "tcp",
        }
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory health of an upstream; only affects the order endpoints are tried in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointHealth {
    Up,
    Degraded,
}

/// A remote recursive resolver. `order` is the position in the configured
/// list and is the static priority (lower is tried first).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamEndpoint {
    pub addr: SocketAddr,
    pub protocol: DnsProtocol,
    pub order: usize,
}

impl UpstreamEndpoint {
    pub fn new(addr: SocketAddr, protocol: DnsProtocol, order: usize) -> Self {
        Self {
            addr,
            protocol,
            order,
        }
    }

    pub fn udp(addr: SocketAddr, order: usize) -> Self {
        Self::new(addr, DnsProtocol::Udp, order)
    }

    pub fn tcp(addr: SocketAddr, order: usize) -> Self {
        Self::new(addr, DnsProtocol::Tcp, order)
    }

    /// Parses `udp://IP:PORT`, `tcp://IP:PORT`, `IP:PORT` or a bare `IP`
    /// (UDP, port 53).
    pub fn parse(s: &str, order: usize) -> Result<Self, DomainError> {
        let s = s.trim();
        let (protocol, rest) = if let Some(rest) = s.strip_prefix("udp://") {
            (DnsProtocol::Udp, rest)
        } else if let Some(rest) = s.strip_prefix("tcp://") {
            (DnsProtocol::Tcp, rest)
        } else if s.contains("://") {
            return Err(DomainError::InvalidUpstream(format!(
                "unsupported scheme in '{}'. Expected: udp://IP:PORT, tcp://IP:PORT, IP:PORT or IP",
                s
            )));
        } else {
            (DnsProtocol::Udp, s)
        };

        let addr = parse_socket_addr(rest).ok_or_else(|| {
            DomainError::InvalidUpstream(format!(
                "invalid {} address '{}'",
                protocol.as_str(),
                rest
            ))
        })?;

        Ok(Self::new(addr, protocol, order))
    }
}

impl fmt::Display for UpstreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol.scheme(), self.addr)
    }
}

impl FromStr for UpstreamEndpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, 0)
    }
}

fn parse_socket_addr(s: &str) -> Option<SocketAddr> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Some(addr);
    }
    let bare = s
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(s);
    bare.parse::<IpAddr>()
        .ok()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
}
