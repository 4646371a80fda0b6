//! DNS Proxy Server application layer: ports implemented by the
//! infrastructure crate and the use cases driving them.
pub mod ports;
pub mod use_cases;
