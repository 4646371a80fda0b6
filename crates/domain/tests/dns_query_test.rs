use dps_domain::{normalize_domain, DnsQuery, RecordType};
use std::collections::HashSet;

#[test]
fn test_query_name_is_normalized() {
    let query = DnsQuery::new("Example.COM.", RecordType::A);
    assert_eq!(query.domain(), "example.com");
    assert_eq!(query.record_type(), RecordType::A);
}

#[test]
fn test_queries_differing_in_case_are_equal() {
    let a = DnsQuery::new("WWW.Example.com", RecordType::AAAA);
    let b = DnsQuery::new("www.example.com..", RecordType::AAAA);
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn test_queries_differing_in_type_are_distinct() {
    let a = DnsQuery::new("example.com", RecordType::A);
    let b = DnsQuery::new("example.com", RecordType::AAAA);
    assert_ne!(a, b);
}

#[test]
fn test_root_name_normalizes_to_empty() {
    assert_eq!(normalize_domain("."), "");
}

#[test]
fn test_record_type_codes() {
    assert_eq!(RecordType::from_u16(1), RecordType::A);
    assert_eq!(RecordType::from_u16(28), RecordType::AAAA);
    assert_eq!(RecordType::from_u16(99), RecordType::Other(99));
    assert_eq!(RecordType::Other(99).to_u16(), 99);
    assert_eq!(RecordType::CAA.to_u16(), 257);
}

#[test]
fn test_record_type_parsing() {
    assert_eq!("aaaa".parse::<RecordType>().unwrap(), RecordType::AAAA);
    assert_eq!("TYPE65".parse::<RecordType>().unwrap(), RecordType::HTTPS);
    assert_eq!("TYPE99".parse::<RecordType>().unwrap(), RecordType::Other(99));
    assert!("BOGUS".parse::<RecordType>().is_err());
    assert_eq!(RecordType::Other(99).to_string(), "TYPE99");
}
