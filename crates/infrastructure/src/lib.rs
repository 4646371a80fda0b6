//! DNS Proxy Server infrastructure: the resolution engine and its network
//! adapters.
pub mod dns;
