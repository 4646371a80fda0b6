use dps_jobs::CacheSweepJob;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::MockCacheMaintenancePort;

#[tokio::test(start_paused = true)]
async fn test_sweep_fires_on_interval() {
    let mock = Arc::new(MockCacheMaintenancePort::new().removing(3));
    let job = Arc::new(CacheSweepJob::new(mock.clone()).with_interval(Duration::from_secs(60)));

    tokio::spawn(job.start());

    sleep(Duration::from_secs(59)).await;
    assert_eq!(mock.sweep_call_count(), 0, "first sweep waits a full interval");

    sleep(Duration::from_secs(2)).await;
    assert_eq!(mock.sweep_call_count(), 1);

    sleep(Duration::from_secs(120)).await;
    assert_eq!(mock.sweep_call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_error_is_non_fatal() {
    let mock = Arc::new(MockCacheMaintenancePort::new());
    mock.set_should_fail(true);

    let job = Arc::new(CacheSweepJob::new(mock.clone()).with_interval(Duration::from_secs(1)));
    tokio::spawn(job.start());

    sleep(Duration::from_millis(2500)).await;

    assert!(
        mock.sweep_call_count() >= 2,
        "Job should continue running after sweep errors"
    );
}

#[tokio::test(start_paused = true)]
async fn test_sweep_stops_on_cancellation() {
    let mock = Arc::new(MockCacheMaintenancePort::new());
    let token = CancellationToken::new();
    let job = Arc::new(
        CacheSweepJob::new(mock.clone())
            .with_interval(Duration::from_secs(1))
            .with_cancellation(token.clone()),
    );

    let handle = tokio::spawn(job.start());
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(mock.sweep_call_count(), 1);

    token.cancel();
    handle.await.unwrap();

    sleep(Duration::from_secs(5)).await;
    assert_eq!(mock.sweep_call_count(), 1, "Should not fire after cancellation");
}
