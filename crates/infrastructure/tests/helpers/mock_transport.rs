use super::wire_builder::ResponseBuilder;
use async_trait::async_trait;
use bytes::Bytes;
use dps_application::ports::UpstreamTransport;
use dps_domain::{DnsProtocol, DomainError, UpstreamEndpoint};
use std::collections::{HashMap, VecDeque};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What an endpoint does with the next query it receives.
#[derive(Debug, Clone)]
pub enum Behavior {
    Answer { ip: Ipv4Addr, ttl: u32 },
    NxDomain { soa: Option<(u32, u32)> },
    NoData,
    ServFail,
    /// Never replies; the transport reports a timeout once its budget is spent.
    Hang,
    Refused,
    WrongId,
    /// TC over UDP; a full answer over TCP.
    Truncated { ip: Ipv4Addr, ttl: u32 },
    Delayed(Duration, Box<Behavior>),
}

impl Behavior {
    pub fn answer(ip: [u8; 4], ttl: u32) -> Self {
        Behavior::Answer {
            ip: Ipv4Addr::from(ip),
            ttl,
        }
    }

    pub fn delayed(ms: u64, inner: Behavior) -> Self {
        Behavior::Delayed(Duration::from_millis(ms), Box::new(inner))
    }
}

/// Scripted upstream transport with per-endpoint call counters.
pub struct MockTransport {
    defaults: Mutex<HashMap<SocketAddr, Behavior>>,
    once: Mutex<HashMap<SocketAddr, VecDeque<Behavior>>>,
    calls: Mutex<Vec<(SocketAddr, DnsProtocol)>>,
    total: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            defaults: Mutex::new(HashMap::new()),
            once: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            total: AtomicUsize::new(0),
        }
    }

    pub fn with(addr: SocketAddr, behavior: Behavior) -> Self {
        let transport = Self::new();
        transport.set(addr, behavior);
        transport
    }

    /// Behavior for every query to `addr` not covered by [`Self::push_once`].
    pub fn set(&self, addr: SocketAddr, behavior: Behavior) {
        self.defaults.lock().unwrap().insert(addr, behavior);
    }

    pub fn push_once(&self, addr: SocketAddr, behavior: Behavior) {
        self.once
            .lock()
            .unwrap()
            .entry(addr)
            .or_default()
            .push_back(behavior);
    }

    pub fn calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, addr: SocketAddr) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| *a == addr)
            .count()
    }

    pub fn calls_over(&self, addr: SocketAddr, protocol: DnsProtocol) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, p)| *a == addr && *p == protocol)
            .count()
    }

    fn next_behavior(&self, addr: SocketAddr) -> Behavior {
        if let Some(behavior) = self
            .once
            .lock()
            .unwrap()
            .get_mut(&addr)
            .and_then(VecDeque::pop_front)
        {
            return behavior;
        }
        self.defaults
            .lock()
            .unwrap()
            .get(&addr)
            .cloned()
            .unwrap_or(Behavior::Hang)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn timeout_error(endpoint: &UpstreamEndpoint) -> DomainError {
    DomainError::TransportTimeout {
        server: endpoint.to_string(),
    }
}

fn respond(
    behavior: &Behavior,
    message: &[u8],
    endpoint: &UpstreamEndpoint,
) -> Result<Bytes, DomainError> {
    let reply = ResponseBuilder::reply_to(message);
    let bytes = match behavior {
        Behavior::Answer { ip, ttl } => reply.answer_a(*ip, *ttl).build(),
        Behavior::NxDomain { soa: Some((ttl, minimum)) } => reply.rcode(3).soa(*ttl, *minimum).build(),
        Behavior::NxDomain { soa: None } => reply.rcode(3).build(),
        Behavior::NoData => reply.build(),
        Behavior::ServFail => reply.rcode(2).build(),
        Behavior::WrongId => {
            let id = u16::from_be_bytes([message[0], message[1]]) ^ 0xFFFF;
            reply.id(id).answer_a(Ipv4Addr::new(6, 6, 6, 6), 60).build()
        }
        Behavior::Truncated { ip, ttl } => match endpoint.protocol {
            DnsProtocol::Udp => reply.truncated().build(),
            DnsProtocol::Tcp => reply.answer_a(*ip, *ttl).build(),
        },
        Behavior::Refused => {
            return Err(DomainError::TransportConnectionRefused {
                server: endpoint.to_string(),
            })
        }
        Behavior::Hang | Behavior::Delayed(..) => return Err(timeout_error(endpoint)),
    };
    Ok(Bytes::from(bytes))
}

#[async_trait]
impl UpstreamTransport for MockTransport {
    async fn send(
        &self,
        message: &[u8],
        endpoint: &UpstreamEndpoint,
        timeout: Duration,
    ) -> Result<Bytes, DomainError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.addr, endpoint.protocol));

        let mut behavior = self.next_behavior(endpoint.addr);
        let mut waited = Duration::ZERO;
        while let Behavior::Delayed(delay, inner) = behavior {
            waited += delay;
            behavior = *inner;
        }

        if matches!(behavior, Behavior::Hang) || waited >= timeout {
            tokio::time::sleep(timeout).await;
            return Err(timeout_error(endpoint));
        }
        if !waited.is_zero() {
            tokio::time::sleep(waited).await;
        }

        respond(&behavior, message, endpoint)
    }
}
