#![allow(dead_code)]

pub mod mock_transport;
pub mod wire_builder;

pub use mock_transport::{Behavior, MockTransport};
pub use wire_builder::{client_query, ResponseBuilder};

use dps_domain::UpstreamEndpoint;
use std::net::SocketAddr;

pub fn udp_endpoint(last_octet: u8, order: usize) -> UpstreamEndpoint {
    UpstreamEndpoint::udp(addr(last_octet), order)
}

pub fn addr(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([192, 0, 2, last_octet], 53))
}
