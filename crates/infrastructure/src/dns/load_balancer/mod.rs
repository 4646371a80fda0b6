pub mod health;
pub mod pool;
pub mod query;

pub use health::{EndpointState, HealthTracker};
pub use pool::{UpstreamPolicy, UpstreamPool};
pub use query::{query_endpoint, UpstreamReply};
