use super::health::HealthTracker;
use super::query::{query_endpoint, UpstreamReply};
use async_trait::async_trait;
use dps_application::ports::{UpstreamResolver, UpstreamStatus, UpstreamTransport};
use dps_domain::{
    Answer, AnswerOutcome, AnswerPayload, Config, DnsQuery, DomainError, ResolutionError,
    UpstreamEndpoint,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// How the pool spends its time budget.
#[derive(Debug, Clone)]
pub struct UpstreamPolicy {
    pub attempt_timeout: Duration,
    /// Extra attempts on the same endpoint after a transient I/O error.
    pub io_retries: u32,
    pub degraded_cooldown: Duration,
    /// Negative-answer TTL used when the reply carries no SOA.
    pub negative_ttl: Duration,
}

impl UpstreamPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            attempt_timeout: config.dns.attempt_timeout(),
            io_retries: config.dns.io_retries,
            degraded_cooldown: config.dns.degraded_cooldown(),
            negative_ttl: Duration::from_secs(u64::from(config.cache.negative_ttl)),
        }
    }
}

impl Default for UpstreamPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(500),
            io_retries: 1,
            degraded_cooldown: Duration::from_secs(30),
            negative_ttl: Duration::from_secs(60),
        }
    }
}

/// Ordered failover across the configured upstream servers.
pub struct UpstreamPool {
    endpoints: Vec<UpstreamEndpoint>,
    health: HealthTracker,
    transport: Arc<dyn UpstreamTransport>,
    policy: UpstreamPolicy,
}

impl UpstreamPool {
    pub fn new(
        endpoints: Vec<UpstreamEndpoint>,
        policy: UpstreamPolicy,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Self {
        info!(
            servers = endpoints.len(),
            attempt_timeout_ms = policy.attempt_timeout.as_millis() as u64,
            io_retries = policy.io_retries,
            "Upstream pool initialized"
        );

        Self {
            health: HealthTracker::new(policy.degraded_cooldown),
            endpoints,
            transport,
            policy,
        }
    }

    pub fn from_config(
        config: &Config,
        transport: Arc<dyn UpstreamTransport>,
    ) -> Result<Self, DomainError> {
        let endpoints = config.dns.upstream_endpoints()?;
        Ok(Self::new(
            endpoints,
            UpstreamPolicy::from_config(config),
            transport,
        ))
    }

    pub fn endpoints(&self) -> &[UpstreamEndpoint] {
        &self.endpoints
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }

    fn to_answer(&self, query: &DnsQuery, reply: UpstreamReply) -> Answer {
        let response = &reply.response;
        if response.is_positive() {
            let ttl = Duration::from_secs(u64::from(response.min_ttl.unwrap_or(0)));
            return Answer::from_upstream(
                query.clone(),
                AnswerOutcome::Resolved(AnswerPayload::Message(reply.bytes)),
                ttl,
            );
        }

        let ttl = response
            .negative_ttl
            .map(|secs| Duration::from_secs(u64::from(secs)))
            .unwrap_or(self.policy.negative_ttl);
        Answer::from_upstream(query.clone(), AnswerOutcome::NoSuchName(Some(reply.bytes)), ttl)
    }
}

#[async_trait]
impl UpstreamResolver for UpstreamPool {
    async fn resolve(&self, query: &DnsQuery, deadline: Instant) -> Result<Answer, ResolutionError> {
        if self.endpoints.is_empty() {
            return Err(ResolutionError::AllUpstreamFailed { attempted: 0 });
        }

        let mut attempted = 0usize;

        for endpoint in self.health.ordered(&self.endpoints) {
            if Instant::now() >= deadline {
                return Err(ResolutionError::Timeout);
            }
            attempted += 1;
            let mut retries_left = self.policy.io_retries;

            loop {
                let attempt_deadline = (Instant::now() + self.policy.attempt_timeout).min(deadline);

                debug!(
                    domain = %query.domain(),
                    record_type = %query.record_type(),
                    server = %endpoint,
                    "Querying upstream"
                );

                let attempt = query_endpoint(
                    self.transport.as_ref(),
                    endpoint,
                    query,
                    attempt_deadline,
                );

                match tokio::time::timeout_at(attempt_deadline, attempt).await {
                    Ok(Ok(reply)) => {
                        self.health.mark_up(endpoint);
                        debug!(
                            domain = %query.domain(),
                            server = %endpoint,
                            protocol = %reply.protocol_used,
                            rcode = ?reply.response.rcode,
                            "Upstream answered"
                        );
                        return Ok(self.to_answer(query, reply));
                    }
                    Ok(Err(e)) if e.is_transient_io() && retries_left > 0 => {
                        retries_left -= 1;
                        debug!(server = %endpoint, error = %e, "Transient upstream error, retrying");
                    }
                    Ok(Err(DomainError::InvalidDnsResponse(reason))) => {
                        let malformed = ResolutionError::MalformedUpstreamResponse {
                            server: endpoint.to_string(),
                            reason,
                        };
                        self.health.mark_degraded(endpoint, &malformed.to_string());
                        break;
                    }
                    Ok(Err(e)) => {
                        self.health.mark_degraded(endpoint, &e.to_string());
                        if e.is_timeout() && Instant::now() >= deadline {
                            return Err(ResolutionError::Timeout);
                        }
                        break;
                    }
                    Err(_) => {
                        self.health.mark_degraded(endpoint, "attempt timed out");
                        if Instant::now() >= deadline {
                            return Err(ResolutionError::Timeout);
                        }
                        break;
                    }
                }
            }
        }

        Err(ResolutionError::AllUpstreamFailed { attempted })
    }

    fn upstream_status(&self) -> Vec<UpstreamStatus> {
        self.endpoints
            .iter()
            .map(|endpoint| UpstreamStatus {
                endpoint: endpoint.clone(),
                health: self.health.health(endpoint),
            })
            .collect()
    }
}
