use super::wire::{cap_record_ttls, encode_name, WireQuestion, HEADER_LEN};
use dps_domain::RecordData;
use std::net::IpAddr;
use tracing::debug;

const OPT_RECORD: [u8; 11] = [
    0x00, 0x00, 0x29, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Largest UDP reply to a client that did not advertise EDNS0.
pub const MAX_PLAIN_UDP_SIZE: usize = 512;

pub const RCODE_FORMERR: u8 = 1;
pub const RCODE_SERVFAIL: u8 = 2;
pub const RCODE_NXDOMAIN: u8 = 3;
pub const RCODE_NOTIMP: u8 = 4;

const FLAG_QR: u8 = 0x80;
const FLAG_AA: u8 = 0x04;
const FLAG_TC: u8 = 0x02;
const FLAG_RD: u8 = 0x01;
const FLAG_RA: u8 = 0x80;

fn push_header(buf: &mut Vec<u8>, id: u16, flags_hi: u8, rcode: u8, qdcount: u16, ancount: u16, arcount: u16) {
    buf.extend_from_slice(&id.to_be_bytes());
    buf.push(flags_hi);
    buf.push(FLAG_RA | (rcode & 0x0F));
    buf.extend_from_slice(&qdcount.to_be_bytes());
    buf.extend_from_slice(&ancount.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes());
    buf.extend_from_slice(&arcount.to_be_bytes());
}

fn rd_bit(query: &WireQuestion) -> u8 {
    if query.recursion_desired() {
        FLAG_RD
    } else {
        0
    }
}

/// Authoritative answer synthesized from local records. The owner name of
/// every record is a pointer to the question name.
pub fn build_static_response(
    query: &WireQuestion,
    query_buf: &[u8],
    records: &[RecordData],
    ttl: u32,
) -> Vec<u8> {
    let question = query.question_bytes(query_buf);
    let mut buf = Vec::with_capacity(HEADER_LEN + question.len() + records.len() * 28 + OPT_RECORD.len());

    push_header(
        &mut buf,
        query.id,
        FLAG_QR | FLAG_AA | rd_bit(query),
        0,
        1,
        records.len() as u16,
        u16::from(query.has_edns),
    );
    buf.extend_from_slice(question);

    for record in records {
        buf.extend_from_slice(&[0xC0, 0x0C]);
        buf.extend_from_slice(&record.record_type().to_u16().to_be_bytes());
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&ttl.to_be_bytes());

        match record {
            RecordData::Address(IpAddr::V4(ipv4)) => {
                buf.extend_from_slice(&4u16.to_be_bytes());
                buf.extend_from_slice(&ipv4.octets());
            }
            RecordData::Address(IpAddr::V6(ipv6)) => {
                buf.extend_from_slice(&16u16.to_be_bytes());
                buf.extend_from_slice(&ipv6.octets());
            }
            RecordData::CanonicalName(target) => {
                let mut rdata = Vec::with_capacity(target.len() + 2);
                encode_name(target, &mut rdata);
                buf.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
                buf.extend_from_slice(&rdata);
            }
        }
    }

    if query.has_edns {
        buf.extend_from_slice(&OPT_RECORD);
    }
    buf
}

/// Upstream message rewritten for this client: its ID, and its own question
/// bytes so the letter case it sent is echoed back. With `ttl_cap` set, no
/// record TTL exceeds it. Falls back to a TC-flagged reply when the message
/// does not fit a plain UDP datagram.
pub fn relay_upstream_response(
    query: &WireQuestion,
    query_buf: &[u8],
    upstream: &[u8],
    ttl_cap: Option<u32>,
) -> Vec<u8> {
    if upstream.len() > MAX_PLAIN_UDP_SIZE && !query.has_edns {
        return build_truncated_response(query, query_buf);
    }

    let mut buf = upstream.to_vec();
    if let Some(id) = buf.get_mut(..2) {
        id.copy_from_slice(&query.id.to_be_bytes());
    }

    let question = query.question_bytes(query_buf);
    let end = HEADER_LEN + question.len();
    if buf.len() >= end && buf[HEADER_LEN..end].eq_ignore_ascii_case(question) {
        buf[HEADER_LEN..end].copy_from_slice(question);
    }

    if let Some(max_ttl) = ttl_cap {
        if cap_record_ttls(&mut buf, max_ttl).is_none() {
            debug!(domain = %query.name, "Could not walk relayed records to cap TTLs");
        }
    }
    buf
}

/// Question-only reply with TC set, telling the client to retry over TCP.
pub fn build_truncated_response(query: &WireQuestion, query_buf: &[u8]) -> Vec<u8> {
    let question = query.question_bytes(query_buf);
    let mut buf = Vec::with_capacity(HEADER_LEN + question.len());
    push_header(&mut buf, query.id, FLAG_QR | FLAG_TC | rd_bit(query), 0, 1, 0, 0);
    buf.extend_from_slice(question);
    buf
}

/// Empty reply carrying `rcode`. Echoes the question when one was parsed.
pub fn build_error_response(id: u16, query: Option<(&WireQuestion, &[u8])>, rcode: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + 64);
    match query {
        Some((query, query_buf)) => {
            push_header(&mut buf, id, FLAG_QR | rd_bit(query), rcode, 1, 0, 0);
            buf.extend_from_slice(query.question_bytes(query_buf));
        }
        None => push_header(&mut buf, id, FLAG_QR, rcode, 0, 0, 0),
    }
    buf
}
