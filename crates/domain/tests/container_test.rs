use dps_domain::{ContainerInfo, ContainerNetwork};
use std::collections::BTreeMap;
use std::net::IpAddr;

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn network(name: &str, ipv4: Option<&str>) -> ContainerNetwork {
    ContainerNetwork {
        name: name.to_string(),
        ipv4: ipv4.map(ip),
        ipv6: None,
    }
}

#[test]
fn test_hostnames_include_container_domain() {
    let container = ContainerInfo {
        name: "/web".to_string(),
        hostname: Some("web-host".to_string()),
        domain_name: Some("acme.com".to_string()),
        ..Default::default()
    };

    assert_eq!(
        container.hostnames("docker"),
        vec![
            "web-host".to_string(),
            "web-host.acme.com".to_string(),
            "web.docker".to_string()
        ]
    );
}

#[test]
fn test_hostnames_skip_duplicates() {
    let container = ContainerInfo {
        name: "/web".to_string(),
        hostname: Some("Web.Docker".to_string()),
        ..Default::default()
    };

    assert_eq!(container.hostnames("docker"), vec!["Web.Docker".to_string()]);
}

#[test]
fn test_hostnames_without_hostname() {
    let container = ContainerInfo {
        name: "db".to_string(),
        ..Default::default()
    };
    assert_eq!(container.hostnames("docker"), vec!["db.docker".to_string()]);
}

#[test]
fn test_best_ip_prefers_labelled_network() {
    let mut labels = BTreeMap::new();
    labels.insert("dps.network".to_string(), "backend".to_string());
    let container = ContainerInfo {
        labels,
        networks: vec![
            network("bridge", Some("172.17.0.2")),
            network("backend", Some("10.10.0.4")),
            network("dps", Some("172.20.0.3")),
        ],
        ..Default::default()
    };

    assert_eq!(container.best_ipv4(), Some(ip("10.10.0.4")));
}

#[test]
fn test_best_ip_prefers_dps_over_bridge() {
    let container = ContainerInfo {
        networks: vec![
            network("bridge", Some("172.17.0.2")),
            network("dps", Some("172.20.0.3")),
        ],
        ..Default::default()
    };
    assert_eq!(container.best_ipv4(), Some(ip("172.20.0.3")));
}

#[test]
fn test_best_ip_falls_back_to_other_networks_by_name() {
    let container = ContainerInfo {
        networks: vec![
            network("zeta", Some("10.0.9.9")),
            network("alpha", Some("10.0.1.1")),
            network("bridge", None),
        ],
        ..Default::default()
    };
    assert_eq!(container.best_ipv4(), Some(ip("10.0.1.1")));
}

#[test]
fn test_best_ip_uses_host_machine_when_no_network_has_one() {
    let container = ContainerInfo {
        networks: vec![network("host", None)],
        host_machine_ip: Some(ip("192.168.0.10")),
        ..Default::default()
    };
    assert_eq!(container.best_ipv4(), Some(ip("192.168.0.10")));
    assert_eq!(container.best_ipv6(), None);
}
