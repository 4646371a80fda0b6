mod helpers;

use bytes::Bytes;
use dps_application::use_cases::HandleDnsQueryUseCase;
use dps_domain::{
    Answer, AnswerOutcome, AnswerPayload, AnswerSource, DnsQuery, DnsRequest, RecordData,
    RecordType, ResolutionErrorKind,
};
use helpers::MockDnsSolver;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100));

fn upstream_answer(domain: &str) -> Answer {
    Answer::from_upstream(
        DnsQuery::new(domain, RecordType::A),
        AnswerOutcome::Resolved(AnswerPayload::Message(Bytes::from_static(b"wire"))),
        Duration::from_secs(60),
    )
}

#[tokio::test]
async fn test_execute_normalizes_and_returns_solver_answer() {
    let solver = Arc::new(MockDnsSolver::new());
    solver.set_answer("example.com", upstream_answer("example.com"));
    let use_case = HandleDnsQueryUseCase::new(solver.clone(), Duration::from_secs(2));

    let request = DnsRequest::new("EXAMPLE.com.", RecordType::A, CLIENT_IP);
    let answer = use_case.execute(&request).await;

    assert_eq!(answer.source, AnswerSource::Upstream);
    assert!(answer.is_resolved());
    assert_eq!(solver.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_execute_passes_client_deadline() {
    let solver = Arc::new(MockDnsSolver::new());
    let use_case = HandleDnsQueryUseCase::new(solver.clone(), Duration::from_millis(1500));

    let before = Instant::now();
    use_case
        .execute(&DnsRequest::new("example.com", RecordType::A, CLIENT_IP))
        .await;

    assert_eq!(solver.last_deadline(), Some(before + Duration::from_millis(1500)));
}

#[tokio::test]
async fn test_stats_count_each_outcome() {
    let solver = Arc::new(MockDnsSolver::new());
    let static_query = DnsQuery::new("app.local", RecordType::A);
    solver.set_answer(
        "app.local",
        Answer::from_static(
            static_query,
            RecordData::Address("10.0.0.5".parse().unwrap()),
            300,
        ),
    );
    solver.set_answer("example.com", upstream_answer("example.com"));
    solver.set_answer(
        "missing.example",
        Answer::from_upstream(
            DnsQuery::new("missing.example", RecordType::A),
            AnswerOutcome::NoSuchName(None),
            Duration::from_secs(30),
        ),
    );

    let use_case = HandleDnsQueryUseCase::new(solver, Duration::from_secs(2));
    for domain in ["app.local", "example.com", "missing.example", "down.example"] {
        use_case
            .execute(&DnsRequest::new(domain, RecordType::A, CLIENT_IP))
            .await;
    }

    let stats = use_case.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.from_static, 1);
    assert_eq!(stats.from_upstream, 2);
    assert_eq!(stats.no_such_name, 1);
    assert_eq!(stats.failed, 1);
}

#[tokio::test]
async fn test_failed_answer_is_returned_not_raised() {
    let solver = Arc::new(MockDnsSolver::new());
    let use_case = HandleDnsQueryUseCase::new(solver, Duration::from_secs(2));

    let answer = use_case
        .execute(&DnsRequest::new("down.example", RecordType::AAAA, CLIENT_IP))
        .await;

    assert_eq!(
        answer.failure_kind(),
        Some(ResolutionErrorKind::AllUpstreamFailed)
    );
}
