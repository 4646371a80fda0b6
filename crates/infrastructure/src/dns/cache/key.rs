use compact_str::CompactString;
use dps_domain::{DnsQuery, RecordType};
use std::fmt;

/// Identity of a cached answer and of an in-flight resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub domain: CompactString,
    pub record_type: RecordType,
}

impl CacheKey {
    #[inline]
    pub fn new(domain: &str, record_type: RecordType) -> Self {
        Self {
            domain: CompactString::from(domain),
            record_type,
        }
    }

    #[inline]
    pub fn from_query(query: &DnsQuery) -> Self {
        Self::new(query.domain(), query.record_type())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.record_type)
    }
}
