use dps_domain::{Config, DomainError};

/// Applies a validated configuration to the running resolution engine.
pub trait ConfigReloadPort: Send + Sync {
    fn apply(&self, config: &Config) -> Result<(), DomainError>;
}
