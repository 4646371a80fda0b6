use dps_domain::{DnsConfig, DnsProtocol, DomainError, UpstreamEndpoint};
use std::net::SocketAddr;

#[test]
fn test_parse_udp() {
    let endpoint: UpstreamEndpoint = "udp://8.8.8.8:53".parse().unwrap();
    assert_eq!(endpoint.protocol, DnsProtocol::Udp);
    assert_eq!(endpoint.addr, "8.8.8.8:53".parse::<SocketAddr>().unwrap());
}

#[test]
fn test_parse_udp_default() {
    let endpoint: UpstreamEndpoint = "8.8.8.8:53".parse().unwrap();
    assert_eq!(endpoint.protocol, DnsProtocol::Udp);
}

#[test]
fn test_parse_tcp() {
    let endpoint: UpstreamEndpoint = "tcp://1.1.1.1:5353".parse().unwrap();
    assert_eq!(endpoint.protocol, DnsProtocol::Tcp);
    assert_eq!(endpoint.addr.port(), 5353);
}

#[test]
fn test_parse_bare_ip_uses_port_53() {
    let endpoint: UpstreamEndpoint = "9.9.9.9".parse().unwrap();
    assert_eq!(endpoint.addr, "9.9.9.9:53".parse::<SocketAddr>().unwrap());
}

#[test]
fn test_parse_ipv6_with_port() {
    let endpoint: UpstreamEndpoint = "tcp://[2001:4860:4860::8888]:53".parse().unwrap();
    assert_eq!(endpoint.protocol, DnsProtocol::Tcp);
    assert!(endpoint.addr.is_ipv6());
}

#[test]
fn test_parse_bracketed_ipv6_without_port() {
    let endpoint: UpstreamEndpoint = "[::1]".parse().unwrap();
    assert_eq!(endpoint.addr, "[::1]:53".parse::<SocketAddr>().unwrap());
}

#[test]
fn test_parse_rejects_unsupported_scheme() {
    let result: Result<UpstreamEndpoint, _> = "tls://1.1.1.1:853".parse();
    assert!(matches!(result, Err(DomainError::InvalidUpstream(_))));
}

#[test]
fn test_parse_rejects_hostname() {
    let result: Result<UpstreamEndpoint, _> = "udp://dns.google:53".parse();
    assert!(result.is_err());
}

#[test]
fn test_display_round_trips_scheme() {
    let endpoint = UpstreamEndpoint::parse("1.1.1.1:53", 0).unwrap();
    assert_eq!(endpoint.to_string(), "udp://1.1.1.1:53");
}

#[test]
fn test_upstream_endpoints_keep_declaration_order() {
    let config = DnsConfig {
        upstream_servers: vec![
            "tcp://10.0.0.1:53".to_string(),
            "10.0.0.2".to_string(),
            "udp://10.0.0.3:5300".to_string(),
        ],
        ..Default::default()
    };

    let endpoints = config.upstream_endpoints().unwrap();
    let orders: Vec<usize> = endpoints.iter().map(|e| e.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(endpoints[0].protocol, DnsProtocol::Tcp);
    assert_eq!(endpoints[2].addr.port(), 5300);
}
