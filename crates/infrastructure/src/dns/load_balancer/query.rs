use crate::dns::forwarding::{MessageBuilder, ParsedResponse, ResponseParser};
use crate::dns::wire::parse_question;
use bytes::Bytes;
use dps_application::ports::UpstreamTransport;
use dps_domain::{DnsProtocol, DnsQuery, DomainError, UpstreamEndpoint};
use tokio::time::Instant;
use tracing::debug;

/// A validated reply from one upstream.
pub struct UpstreamReply {
    pub bytes: Bytes,
    pub response: ParsedResponse,
    pub protocol_used: DnsProtocol,
}

/// Execute a query against a single upstream endpoint.
///
/// Handles the full flow: build message → send via transport → validate →
/// parse. A truncated UDP reply is retried once over TCP on the same
/// address. Any reply that is not a usable answer comes back as
/// `InvalidDnsResponse`: wrong ID, a different question, an unparseable
/// message or an rcode other than NOERROR/NXDOMAIN.
pub async fn query_endpoint(
    transport: &dyn UpstreamTransport,
    endpoint: &UpstreamEndpoint,
    query: &DnsQuery,
    deadline: Instant,
) -> Result<UpstreamReply, DomainError> {
    let (id, query_bytes) = MessageBuilder::build_query(query.domain(), query.record_type())?;

    let bytes = exchange(transport, endpoint, &query_bytes, deadline).await?;
    let truncated = validate(&bytes, id, query)?;

    let (bytes, protocol_used) = if truncated && endpoint.protocol == DnsProtocol::Udp {
        debug!(server = %endpoint, "Response truncated (TC bit), retrying via TCP");

        let tcp_endpoint = UpstreamEndpoint::tcp(endpoint.addr, endpoint.order);
        let tcp_bytes = exchange(transport, &tcp_endpoint, &query_bytes, deadline).await?;
        validate(&tcp_bytes, id, query)?;
        (tcp_bytes, DnsProtocol::Tcp)
    } else {
        (bytes, endpoint.protocol)
    };

    let response = ResponseParser::parse(&bytes)?;

    if !response.is_positive() && !response.is_nxdomain() && !response.is_nodata() {
        return Err(DomainError::InvalidDnsResponse(format!(
            "answered {}",
            ResponseParser::rcode_to_status(response.rcode)
        )));
    }

    Ok(UpstreamReply {
        bytes,
        response,
        protocol_used,
    })
}

async fn exchange(
    transport: &dyn UpstreamTransport,
    endpoint: &UpstreamEndpoint,
    query_bytes: &[u8],
    deadline: Instant,
) -> Result<Bytes, DomainError> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(DomainError::TransportTimeout {
            server: endpoint.to_string(),
        });
    }
    transport.send(query_bytes, endpoint, remaining).await
}

/// Checks the reply belongs to this query. Returns its TC flag.
fn validate(bytes: &[u8], id: u16, query: &DnsQuery) -> Result<bool, DomainError> {
    let malformed = |reason: &str| DomainError::InvalidDnsResponse(reason.to_string());

    let question = parse_question(bytes).ok_or_else(|| malformed("Unreadable response"))?;

    if question.id != id {
        return Err(malformed("Response ID mismatch"));
    }
    if !question.is_response() {
        return Err(malformed("QR bit not set"));
    }
    if question.name != query.domain() || question.record_type != query.record_type() {
        return Err(malformed("Response question mismatch"));
    }

    Ok(question.truncated())
}
