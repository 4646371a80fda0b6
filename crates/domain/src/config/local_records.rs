use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;

use crate::dns_record::{RecordData, RecordOrigin, RecordType, StaticRecord};
use crate::errors::DomainError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalDnsRecord {
    pub hostname: String,

    #[serde(default)]
    pub domain: Option<String>,

    /// Address for A/AAAA records.
    #[serde(default)]
    pub ip: Option<String>,

    /// Target name for CNAME records.
    #[serde(default)]
    pub target: Option<String>,

    pub record_type: String,

    #[serde(default)]
    pub ttl: Option<u32>,
}

impl LocalDnsRecord {
    pub fn fqdn(&self, default_domain: &Option<String>) -> String {
        if let Some(ref domain) = self.domain {
            format!("{}.{}", self.hostname, domain)
        } else if let Some(ref default) = default_domain {
            format!("{}.{}", self.hostname, default)
        } else {
            self.hostname.clone()
        }
    }

    pub fn ttl_or_default(&self) -> u32 {
        self.ttl.unwrap_or(300)
    }

    pub fn to_static_record(&self, default_domain: &Option<String>) -> Result<StaticRecord, DomainError> {
        let fqdn = self.fqdn(default_domain);
        let record_type: RecordType = self
            .record_type
            .parse()
            .map_err(DomainError::InvalidRecord)?;

        let data = match record_type {
            RecordType::A | RecordType::AAAA => {
                let raw = self.ip.as_deref().ok_or_else(|| {
                    DomainError::InvalidRecord(format!("{} record {} has no ip", record_type, fqdn))
                })?;
                let ip: IpAddr = raw
                    .parse()
                    .map_err(|_| DomainError::InvalidIpAddress(raw.to_string()))?;
                let data = RecordData::Address(ip);
                if data.record_type() != record_type {
                    return Err(DomainError::InvalidRecord(format!(
                        "{} is not a valid {} address for {}",
                        ip, record_type, fqdn
                    )));
                }
                data
            }
            RecordType::CNAME => {
                let target = self.target.as_deref().ok_or_else(|| {
                    DomainError::InvalidRecord(format!("CNAME record {} has no target", fqdn))
                })?;
                RecordData::CanonicalName(Arc::from(target.trim_end_matches('.')))
            }
            other => {
                return Err(DomainError::InvalidRecord(format!(
                    "record type {} is not supported for local records",
                    other
                )))
            }
        };

        StaticRecord::new(&fqdn, data, self.ttl_or_default(), RecordOrigin::Config)
    }
}
