use dps_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use tracing::debug;

/// The parts of an upstream reply the resolver acts on.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub rcode: ResponseCode,

    pub truncated: bool,

    pub answer_count: usize,

    /// Lowest TTL among the answer records.
    pub min_ttl: Option<u32>,

    /// `min(SOA.minimum, SOA record TTL)` from the authority section.
    pub negative_ttl: Option<u32>,
}

impl ParsedResponse {
    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    pub fn is_nodata(&self) -> bool {
        self.rcode == ResponseCode::NoError && self.answer_count == 0
    }

    pub fn is_positive(&self) -> bool {
        self.rcode == ResponseCode::NoError && self.answer_count > 0
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<ParsedResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = message.response_code();
        let truncated = message.truncated();

        let min_ttl = message.answers().iter().map(|record| record.ttl()).min();

        let negative_ttl = message.name_servers().iter().find_map(|r| {
            if let RData::SOA(soa) = r.data() {
                Some(soa.minimum().min(r.ttl()))
            } else {
                None
            }
        });

        debug!(
            rcode = ?rcode,
            answers = message.answers().len(),
            truncated = truncated,
            min_ttl = ?min_ttl,
            negative_ttl = ?negative_ttl,
            "DNS response parsed"
        );

        Ok(ParsedResponse {
            rcode,
            truncated,
            answer_count: message.answers().len(),
            min_ttl,
            negative_ttl,
        })
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
