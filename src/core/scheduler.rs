//! Self-pacing rollup scheduler.
//!
//! Repeatedly invokes the [`ActivityMonitor`], appends each rollup to the
//! output queue, and sleeps an adaptive duration before the next
//! invocation. The sleep is `max(inactivity_window - elapsed, min_sleep)`:
//! close to a full window while activity is fresh, floored at `min_sleep`
//! once inactivity has been declared. Re-checks are therefore frequent
//! during inactivity and sparse during activity, which is the intended
//! pacing, not an inversion.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::Config;
use crate::core::monitor::ActivityMonitor;
use crate::core::rollup::ActivityRollup;
use crate::source::EventStream;

/// Sleep to apply after a rollup with the given elapsed-since-event.
///
/// The first term is the time remaining before the window would elapse
/// again; once inactivity is underway it goes negative and the configured
/// floor takes over.
pub(crate) fn pacing_sleep(
    inactivity_window: Duration,
    elapsed: chrono::Duration,
    min_sleep_time: Duration,
) -> Duration {
    let remaining = chrono::Duration::from_std(inactivity_window)
        .map(|window| window - elapsed)
        .unwrap_or_else(|_| chrono::Duration::zero());
    remaining
        .to_std()
        .unwrap_or(Duration::ZERO)
        .max(min_sleep_time)
}

/// Drives the monitor in a loop and feeds rollups to the output queue.
///
/// The loop has no terminal state of its own; it ends when the shutdown
/// token is cancelled or when the output queue's consumer goes away.
pub struct RollupScheduler {
    monitor: ActivityMonitor,
    inactivity_window: Duration,
    min_sleep_time: Duration,
    rollups: mpsc::Sender<ActivityRollup>,
}

impl RollupScheduler {
    /// Create a scheduler over an event stream, returning the receiving
    /// half of its rollup queue.
    pub fn new(events: EventStream, config: &Config) -> (Self, mpsc::Receiver<ActivityRollup>) {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let monitor = ActivityMonitor::new(events, config.inactivity_window);
        let scheduler = Self {
            monitor,
            inactivity_window: config.inactivity_window,
            min_sleep_time: config.min_sleep_time,
            rollups: tx,
        };
        (scheduler, rx)
    }

    /// Run until cancelled.
    ///
    /// Both the monitor's drain wait and the pacing sleep are
    /// interruptible, so cancellation takes effect promptly.
    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            let rollup = tokio::select! {
                _ = shutdown.cancelled() => break,
                rollup = self.monitor.get() => rollup,
            };

            debug!(
                classification = %rollup.classification,
                latest_event_time = %rollup.latest_event_time,
                elapsed_ms = rollup.elapsed_since_latest_event.num_milliseconds(),
                "rollup computed"
            );

            let pause = pacing_sleep(
                self.inactivity_window,
                rollup.elapsed_since_latest_event,
                self.min_sleep_time,
            );

            if self.rollups.send(rollup).await.is_err() {
                debug!("rollup consumer gone, scheduler stopping");
                break;
            }

            trace!(pause_ms = pause.as_millis() as u64, "pacing sleep");
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = time::sleep(pause) => {}
            }
        }
    }
}
