//! Integration tests for the idlewatch pipeline.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use idlewatch::{
    ActivityEvent, ActivityKind, ActivityMonitor, Classification, Config, Fanout, RollupScheduler,
};

fn test_config(window_ms: u64, min_sleep_ms: u64, fanout: usize) -> Config {
    Config {
        inactivity_window: Duration::from_millis(window_ms),
        min_sleep_time: Duration::from_millis(min_sleep_ms),
        fanout,
        channel_capacity: 64,
    }
}

#[tokio::test]
async fn test_monitor_returns_within_window_on_silence() {
    let (_sender, stream) = idlewatch::source::channel();
    let mut monitor = ActivityMonitor::new(stream, Duration::from_millis(100));

    let first = monitor.get().await;

    let started = std::time::Instant::now();
    let second = monitor.get().await;
    let waited = started.elapsed();

    // One window of waiting, with some scheduling slack.
    assert!(waited >= Duration::from_millis(100));
    assert!(waited < Duration::from_millis(600));
    assert_eq!(second.latest_event_time, first.latest_event_time);
    assert_eq!(second.classification, Classification::Inactivity);
}

#[tokio::test]
async fn test_burst_coalesces_and_intermediates_never_surface() {
    let (sender, stream) = idlewatch::source::channel();
    let mut monitor = ActivityMonitor::new(stream, Duration::from_millis(60));

    let base = Utc::now();
    let times: Vec<_> = (0..5)
        .map(|i| base + ChronoDuration::milliseconds(i * 7))
        .collect();
    for &t in &times {
        sender.emit(ActivityEvent::at(t, ActivityKind::Scroll));
    }
    let newest = *times.last().unwrap();

    let rollup = monitor.get().await;
    assert_eq!(rollup.latest_event_time, newest);

    // The discarded intermediate timestamps are gone for good: another
    // silent round still reports the newest one.
    let rollup = monitor.get().await;
    assert_eq!(rollup.latest_event_time, newest);
}

#[tokio::test]
async fn test_activity_transitions_to_inactivity() {
    let (sender, stream) = idlewatch::source::channel();
    let mut monitor = ActivityMonitor::new(stream, Duration::from_millis(80));

    sender.emit(ActivityEvent::press());
    let rollup = monitor.get().await;
    assert_eq!(rollup.classification, Classification::Activity);

    // Next round drains nothing for a full window, which is exactly the
    // elapsed time needed to tip over the boundary.
    let rollup = monitor.get().await;
    assert_eq!(rollup.classification, Classification::Inactivity);
    assert_eq!(
        rollup.elapsed_since_latest_event,
        rollup.time - rollup.latest_event_time
    );
}

#[tokio::test]
async fn test_scheduler_paces_at_floor_once_inactive() {
    let (_sender, stream) = idlewatch::source::channel();
    let config = test_config(80, 40, 2);
    let (scheduler, mut rollups) = RollupScheduler::new(stream, &config);

    let shutdown = CancellationToken::new();
    let worker = tokio::spawn(scheduler.run(shutdown.clone()));

    // With a silent source every rollup costs one window of draining
    // plus the floor sleep, so three of them arrive well inside a
    // second.
    let mut seen = Vec::new();
    for _ in 0..3 {
        let rollup = timeout(Duration::from_secs(1), rollups.recv())
            .await
            .expect("rollup timed out")
            .expect("scheduler ended early");
        seen.push(rollup);
    }

    assert!(seen
        .iter()
        .all(|r| r.classification == Classification::Inactivity));
    assert!(seen.windows(2).all(|pair| pair[0].time <= pair[1].time));

    shutdown.cancel();
    worker.await.unwrap();
}

#[tokio::test]
async fn test_full_pipeline_broadcasts_identical_streams() {
    let (sender, stream) = idlewatch::source::channel();
    let config = test_config(60, 20, 3);
    let (scheduler, rollups) = RollupScheduler::new(stream, &config);
    let (fanout, outputs) = Fanout::new(rollups, config.fanout, config.channel_capacity);

    let shutdown = CancellationToken::new();
    let workers = vec![
        tokio::spawn(scheduler.run(shutdown.clone())),
        tokio::spawn(fanout.run(shutdown.clone())),
    ];

    sender.emit(ActivityEvent::click());

    let mut streams: Vec<Vec<_>> = Vec::new();
    for mut output in outputs {
        let mut seen = Vec::new();
        for _ in 0..3 {
            let rollup = timeout(Duration::from_secs(2), output.recv())
                .await
                .expect("rollup timed out")
                .expect("broadcast ended early");
            seen.push((rollup.time, rollup.classification));
        }
        streams.push(seen);
    }

    // Every destination observed the same rollups in the same order.
    assert_eq!(streams[0], streams[1]);
    assert_eq!(streams[0], streams[2]);

    shutdown.cancel();
    for worker in workers {
        worker.await.unwrap();
    }
}

#[tokio::test]
async fn test_shutdown_interrupts_drain_wait() {
    let (_sender, stream) = idlewatch::source::channel();
    // A window long enough that only cancellation can end the round.
    let config = test_config(60_000, 1_000, 1);
    let (scheduler, _rollups) = RollupScheduler::new(stream, &config);

    let shutdown = CancellationToken::new();
    let worker = tokio::spawn(scheduler.run(shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();
    timeout(Duration::from_secs(1), worker)
        .await
        .expect("scheduler ignored cancellation")
        .unwrap();
}
