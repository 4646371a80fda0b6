use dps_jobs::{CacheSweepJob, JobRunner};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::MockCacheMaintenancePort;

#[tokio::test]
async fn test_job_runner_empty_starts_cleanly() {
    let handles = JobRunner::new().start().await;
    assert!(handles.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_job_runner_shutdown_token_stops_jobs() {
    let mock = Arc::new(MockCacheMaintenancePort::new());
    let token = CancellationToken::new();

    let handles = JobRunner::new()
        .with_cache_sweep(CacheSweepJob::new(mock.clone()).with_interval(Duration::from_secs(1)))
        .with_shutdown_token(token.clone())
        .start()
        .await;
    assert_eq!(handles.len(), 1);

    sleep(Duration::from_millis(1500)).await;
    token.cancel();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(mock.sweep_call_count(), 1);
}
