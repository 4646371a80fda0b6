mod helpers;

use dps_application::use_cases::ContainerRecordsUseCase;
use dps_application::ports::StaticRecordRegistry;
use dps_domain::{
    ContainerInfo, ContainerNetwork, RecordData, RecordOrigin, RecordType, StaticRecord,
};
use helpers::MockRecordRegistry;
use std::net::IpAddr;
use std::sync::Arc;

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn web_container() -> ContainerInfo {
    ContainerInfo {
        id: "c0ffee".to_string(),
        name: "/web".to_string(),
        hostname: Some("Web.Acme.com".to_string()),
        networks: vec![
            ContainerNetwork {
                name: "bridge".to_string(),
                ipv4: Some(ip("172.17.0.2")),
                ipv6: None,
            },
            ContainerNetwork {
                name: "dps".to_string(),
                ipv4: Some(ip("172.20.0.3")),
                ipv6: Some(ip("fd00::3")),
            },
        ],
        ..Default::default()
    }
}

#[test]
fn test_register_publishes_a_and_aaaa_per_hostname() {
    let registry = Arc::new(MockRecordRegistry::new());
    let use_case = ContainerRecordsUseCase::new(registry.clone(), "docker");

    let count = use_case.register(&web_container()).unwrap();

    assert_eq!(count, 4);
    assert_eq!(registry.dynamic_count(), 4);

    let a = registry.get("web.acme.com", RecordType::A).unwrap();
    assert_eq!(a.data, RecordData::Address(ip("172.20.0.3")));
    assert_eq!(a.origin, RecordOrigin::Dynamic);

    let aaaa = registry.get("web.docker", RecordType::AAAA).unwrap();
    assert_eq!(aaaa.data, RecordData::Address(ip("fd00::3")));
}

#[test]
fn test_register_twice_overwrites() {
    let registry = Arc::new(MockRecordRegistry::new());
    let use_case = ContainerRecordsUseCase::new(registry.clone(), "docker");

    use_case.register(&web_container()).unwrap();
    use_case.register(&web_container()).unwrap();

    assert_eq!(registry.len(), 4);
}

#[test]
fn test_register_without_address_publishes_nothing() {
    let registry = Arc::new(MockRecordRegistry::new());
    let use_case = ContainerRecordsUseCase::new(registry.clone(), "docker");
    let container = ContainerInfo {
        id: "dead".to_string(),
        name: "offline".to_string(),
        ..Default::default()
    };

    assert_eq!(use_case.register(&container).unwrap(), 0);
    assert_eq!(registry.len(), 0);
}

#[test]
fn test_unregister_removes_all_records() {
    let registry = Arc::new(MockRecordRegistry::new());
    let use_case = ContainerRecordsUseCase::new(registry.clone(), "docker");

    use_case.register(&web_container()).unwrap();
    let removed = use_case.unregister(&web_container());

    assert_eq!(removed, 4);
    assert_eq!(registry.len(), 0);
    assert_eq!(use_case.unregister(&web_container()), 0);
}

#[test]
fn test_configured_record_survives_container_lifecycle() {
    let registry = Arc::new(MockRecordRegistry::new());
    registry.register(
        StaticRecord::address("web.docker", ip("10.9.9.9"), 300, RecordOrigin::Config).unwrap(),
    );
    let use_case = ContainerRecordsUseCase::new(registry.clone(), "docker");

    assert_eq!(use_case.register(&web_container()).unwrap(), 3);
    assert_eq!(use_case.unregister(&web_container()), 3);

    let kept = registry.get("web.docker", RecordType::A).unwrap();
    assert_eq!(kept.origin, RecordOrigin::Config);
    assert_eq!(kept.data, RecordData::Address(ip("10.9.9.9")));
    assert_eq!(registry.len(), 1);
}
