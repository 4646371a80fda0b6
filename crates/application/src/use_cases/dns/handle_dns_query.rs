use crate::ports::DnsSolver;
use dps_domain::{Answer, AnswerOutcome, AnswerSource, DnsQuery, DnsRequest};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStatsSnapshot {
    pub total: u64,
    pub from_static: u64,
    pub from_cache: u64,
    pub from_upstream: u64,
    pub no_such_name: u64,
    pub failed: u64,
}

#[derive(Default)]
struct QueryStats {
    total: AtomicU64,
    from_static: AtomicU64,
    from_cache: AtomicU64,
    from_upstream: AtomicU64,
    no_such_name: AtomicU64,
    failed: AtomicU64,
}

pub struct HandleDnsQueryUseCase {
    solver: Arc<dyn DnsSolver>,
    client_timeout: Duration,
    stats: QueryStats,
}

impl HandleDnsQueryUseCase {
    pub fn new(solver: Arc<dyn DnsSolver>, client_timeout: Duration) -> Self {
        Self {
            solver,
            client_timeout,
            stats: QueryStats::default(),
        }
    }

    pub async fn execute(&self, request: &DnsRequest) -> Answer {
        let start = Instant::now();
        let query = DnsQuery::new(&request.domain, request.record_type);

        let answer = self
            .solver
            .solve_until(&query, start + self.client_timeout)
            .await;

        self.record(&answer);

        debug!(
            domain = %query.domain(),
            record_type = %query.record_type(),
            client = %request.client_ip,
            source = answer.source.as_str(),
            status = response_status(&answer),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Query answered"
        );

        answer
    }

    pub fn stats(&self) -> QueryStatsSnapshot {
        QueryStatsSnapshot {
            total: self.stats.total.load(Ordering::Relaxed),
            from_static: self.stats.from_static.load(Ordering::Relaxed),
            from_cache: self.stats.from_cache.load(Ordering::Relaxed),
            from_upstream: self.stats.from_upstream.load(Ordering::Relaxed),
            no_such_name: self.stats.no_such_name.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        }
    }

    fn record(&self, answer: &Answer) {
        self.stats.total.fetch_add(1, Ordering::Relaxed);
        match answer.outcome {
            AnswerOutcome::Failed(_) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                return;
            }
            AnswerOutcome::NoSuchName(_) => {
                self.stats.no_such_name.fetch_add(1, Ordering::Relaxed);
            }
            AnswerOutcome::Resolved(_) => {}
        }
        let counter = match answer.source {
            AnswerSource::Static => &self.stats.from_static,
            AnswerSource::Cache => &self.stats.from_cache,
            AnswerSource::Upstream => &self.stats.from_upstream,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

fn response_status(answer: &Answer) -> &'static str {
    match &answer.outcome {
        AnswerOutcome::Resolved(_) => "NOERROR",
        AnswerOutcome::NoSuchName(_) => "NXDOMAIN",
        AnswerOutcome::Failed(kind) => kind.as_str(),
    }
}
