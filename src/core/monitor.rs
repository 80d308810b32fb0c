//! Activity monitor: turns the raw event stream into rollups.
//!
//! The monitor keeps a single piece of state, the most recent event time
//! it has seen, and classifies each [`get`](ActivityMonitor::get) call as
//! activity or inactivity depending on how long ago that was.
//!
//! Bursty sources are handled by a coalescing drain: while more events
//! are queued behind the one just received, intermediate events are
//! discarded and only the most recent timestamp is kept. Under continuous
//! mouse movement the monitor cares about the newest event, not each of
//! the hundreds before it.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::trace;

use crate::core::rollup::{ActivityRollup, Classification};
use crate::source::EventStream;

/// Classifies the current moment against the most recent input event.
pub struct ActivityMonitor {
    events: EventStream,
    inactivity_window: Duration,
    latest_event_time: DateTime<Utc>,
}

impl ActivityMonitor {
    /// Create a monitor over an event stream.
    ///
    /// The initial `latest_event_time` is the creation time, so a freshly
    /// created monitor reads as active until a full window of silence has
    /// passed.
    pub fn new(events: EventStream, inactivity_window: Duration) -> Self {
        Self {
            events,
            inactivity_window,
            latest_event_time: Utc::now(),
        }
    }

    /// Compute one rollup.
    ///
    /// Never fails and never waits longer than the inactivity window plus
    /// a bounded number of immediate dequeues. A timed-out drain is the
    /// normal "no activity this round" outcome, not an error.
    pub async fn get(&mut self) -> ActivityRollup {
        if let Some(latest) = self.drain_latest().await {
            // Candidates come from real-time reads, so this never moves
            // the state backward under normal wall-clock behavior.
            self.latest_event_time = latest;
        }

        let now = Utc::now();
        let elapsed = now - self.latest_event_time;
        ActivityRollup {
            time: now,
            classification: Classification::from_elapsed(elapsed, self.inactivity_window),
            latest_event_time: self.latest_event_time,
            elapsed_since_latest_event: elapsed,
        }
    }

    /// The most recent event time the monitor has observed.
    pub fn latest_event_time(&self) -> DateTime<Utc> {
        self.latest_event_time
    }

    /// The configured inactivity window.
    pub fn inactivity_window(&self) -> Duration {
        self.inactivity_window
    }

    /// Drain the stream and return the most recent event's timestamp, or
    /// `None` if the stream stays silent for the inactivity window.
    ///
    /// An event is only taken as the result once the queue behind it is
    /// empty; everything pulled before that point is a queue-progress
    /// signal and is discarded.
    async fn drain_latest(&mut self) -> Option<DateTime<Utc>> {
        let mut discarded: usize = 0;
        loop {
            match self.events.recv_timeout(self.inactivity_window).await {
                Some(event) => {
                    if self.events.is_empty() {
                        if discarded > 0 {
                            trace!(discarded, latest = %event.time, "coalesced event burst");
                        }
                        return Some(event.time);
                    }
                    discarded += 1;
                }
                None => return None,
            }
        }
    }
}
