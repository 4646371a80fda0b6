use super::wire::{parse_question, read_id, WireQuestion};
use super::wire_response::{
    build_error_response, build_static_response, relay_upstream_response, RCODE_FORMERR,
    RCODE_NOTIMP, RCODE_NXDOMAIN, RCODE_SERVFAIL,
};
use dps_application::use_cases::HandleDnsQueryUseCase;
use dps_domain::{AnswerOutcome, AnswerPayload, AnswerSource, DnsRequest};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

const OPCODE_QUERY: u8 = 0;
const CLASS_IN: u16 = 1;

/// Turns one inbound datagram into the datagram to send back.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    pub fn use_case(&self) -> &Arc<HandleDnsQueryUseCase> {
        &self.use_case
    }

    /// Returns `None` when nothing should be sent (not a DNS query at all).
    pub async fn handle(&self, packet: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let Some(id) = read_id(packet) else {
            debug!(client = %client, len = packet.len(), "Dropping runt packet");
            return None;
        };

        let Some(query) = parse_question(packet) else {
            warn!(client = %client, "Malformed DNS query");
            return Some(build_error_response(id, None, RCODE_FORMERR));
        };

        if query.is_response() {
            debug!(client = %client, "Ignoring DNS response sent to listener");
            return None;
        }

        if query.opcode() != OPCODE_QUERY || query.qclass != CLASS_IN {
            debug!(
                client = %client,
                opcode = query.opcode(),
                qclass = query.qclass,
                "Unsupported query"
            );
            return Some(build_error_response(id, Some((&query, packet)), RCODE_NOTIMP));
        }

        Some(self.answer(&query, packet, client).await)
    }

    async fn answer(&self, query: &WireQuestion, packet: &[u8], client: SocketAddr) -> Vec<u8> {
        let request = DnsRequest::new(query.name.as_str(), query.record_type, client.ip());
        let answer = self.use_case.execute(&request).await;
        let ttl = u32::try_from(answer.ttl.as_secs()).unwrap_or(u32::MAX);

        match &answer.outcome {
            AnswerOutcome::Resolved(AnswerPayload::Records(records)) => {
                build_static_response(query, packet, records, ttl)
            }
            AnswerOutcome::Resolved(AnswerPayload::Message(bytes))
            | AnswerOutcome::NoSuchName(Some(bytes)) => {
                let ttl_cap = (answer.source == AnswerSource::Cache).then_some(ttl);
                relay_upstream_response(query, packet, bytes, ttl_cap)
            }
            AnswerOutcome::NoSuchName(None) => {
                build_error_response(query.id, Some((query, packet)), RCODE_NXDOMAIN)
            }
            AnswerOutcome::Failed(kind) => {
                debug!(domain = %query.name, reason = kind.as_str(), "Answering SERVFAIL");
                build_error_response(query.id, Some((query, packet)), RCODE_SERVFAIL)
            }
        }
    }
}
