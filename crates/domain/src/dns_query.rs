use super::RecordType;
use std::fmt;
use std::sync::Arc;

/// A (name, type) pair. The name is always stored in canonical form, so two
/// queries that differ only in case or trailing dots compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuery {
    domain: Arc<str>,
    record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: &str, record_type: RecordType) -> Self {
        Self {
            domain: normalize_domain(domain).into(),
            record_type,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn domain_arc(&self) -> &Arc<str> {
        &self.domain
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.domain, self.record_type)
    }
}

/// Case-folds `name` and strips trailing separators.
pub fn normalize_domain(name: &str) -> String {
    let trimmed = name.trim().trim_end_matches('.');
    if trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
        trimmed.to_ascii_lowercase()
    } else {
        trimmed.to_string()
    }
}
