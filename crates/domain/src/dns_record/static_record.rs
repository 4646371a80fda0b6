use super::RecordType;
use crate::dns_query::normalize_domain;
use crate::errors::DomainError;
use std::net::IpAddr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOrigin {
    /// Loaded from the configuration file; replaced wholesale on reload.
    Config,
    /// Registered at runtime, e.g. by the container lifecycle watcher.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordData {
    Address(IpAddr),
    CanonicalName(Arc<str>),
}

impl RecordData {
    /// The record type this data answers.
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::Address(IpAddr::V4(_)) => RecordType::A,
            RecordData::Address(IpAddr::V6(_)) => RecordType::AAAA,
            RecordData::CanonicalName(_) => RecordType::CNAME,
        }
    }
}

/// Locally owned answer for an exact (name, type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRecord {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub data: RecordData,
    pub ttl: u32,
    pub origin: RecordOrigin,
}

impl StaticRecord {
    pub fn new(
        name: &str,
        data: RecordData,
        ttl: u32,
        origin: RecordOrigin,
    ) -> Result<Self, DomainError> {
        let name = normalize_domain(name);
        if name.is_empty() {
            return Err(DomainError::InvalidDomainName(
                "static record name cannot be empty".to_string(),
            ));
        }
        if let RecordData::CanonicalName(target) = &data {
            if target.trim_end_matches('.').is_empty() {
                return Err(DomainError::InvalidRecord(format!(
                    "CNAME target for {} cannot be empty",
                    name
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            record_type: data.record_type(),
            data,
            ttl,
            origin,
        })
    }

    pub fn address(name: &str, ip: IpAddr, ttl: u32, origin: RecordOrigin) -> Result<Self, DomainError> {
        Self::new(name, RecordData::Address(ip), ttl, origin)
    }
}
