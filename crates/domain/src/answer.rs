use crate::dns_query::DnsQuery;
use crate::dns_record::RecordData;
use crate::errors::ResolutionErrorKind;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Which resolution path produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerSource {
    Static,
    Cache,
    Upstream,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Static => "static",
            AnswerSource::Cache => "cache",
            AnswerSource::Upstream => "upstream",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerPayload {
    /// Records synthesized from the local record store.
    Records(Arc<[RecordData]>),
    /// Response message exactly as received from an upstream server.
    Message(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Resolved(AnswerPayload),
    /// Authoritative absence. Carries the upstream's negative response when
    /// one was received so the listener can relay its SOA.
    NoSuchName(Option<Bytes>),
    /// Transient failure. Never cached.
    Failed(ResolutionErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub query: DnsQuery,
    pub outcome: AnswerOutcome,
    pub ttl: Duration,
    pub source: AnswerSource,
    pub obtained_at: Instant,
}

impl Answer {
    pub fn from_static(query: DnsQuery, data: RecordData, ttl: u32) -> Self {
        Self {
            query,
            outcome: AnswerOutcome::Resolved(AnswerPayload::Records(Arc::from([data]))),
            ttl: Duration::from_secs(u64::from(ttl)),
            source: AnswerSource::Static,
            obtained_at: Instant::now(),
        }
    }

    pub fn from_upstream(query: DnsQuery, outcome: AnswerOutcome, ttl: Duration) -> Self {
        Self {
            query,
            outcome,
            ttl,
            source: AnswerSource::Upstream,
            obtained_at: Instant::now(),
        }
    }

    pub fn failed(query: DnsQuery, kind: ResolutionErrorKind) -> Self {
        Self {
            query,
            outcome: AnswerOutcome::Failed(kind),
            ttl: Duration::ZERO,
            source: AnswerSource::Upstream,
            obtained_at: Instant::now(),
        }
    }

    /// Rebuilds the answer with a different TTL, keeping everything else.
    pub fn with_ttl(self, ttl: Duration) -> Self {
        Self { ttl, ..self }
    }

    pub fn expires_at(&self) -> Instant {
        self.obtained_at + self.ttl
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, AnswerOutcome::Resolved(_))
    }

    pub fn is_no_such_name(&self) -> bool {
        matches!(self.outcome, AnswerOutcome::NoSuchName(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, AnswerOutcome::Failed(_))
    }

    /// Failures are transient; only definitive answers may be stored.
    pub fn is_cacheable(&self) -> bool {
        !self.is_failed() && self.source != AnswerSource::Static && !self.ttl.is_zero()
    }

    pub fn failure_kind(&self) -> Option<ResolutionErrorKind> {
        match self.outcome {
            AnswerOutcome::Failed(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&AnswerPayload> {
        match &self.outcome {
            AnswerOutcome::Resolved(payload) => Some(payload),
            _ => None,
        }
    }
}
