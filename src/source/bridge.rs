//! Thread-to-scheduler bridge for raw input events.
//!
//! Input hooks run on OS threads outside the cooperative scheduler's
//! control. This module is the one place where true multi-thread
//! concurrency exists: a [`channel`] yields two asymmetric handles over a
//! single FIFO - a cloneable, non-blocking [`EventSender`] for producer
//! threads and a timeout-capable [`EventStream`] for the single scheduler
//! task. Everything downstream of the stream is single-threaded.
//!
//! Ordering: items dequeue in the order enqueued across all producers
//! combined; each producer's own events stay in its emission order. The
//! backlog is unbounded - capacity limits are a deployment concern for
//! the queues downstream, not for this boundary.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::trace;

use crate::source::types::ActivityEvent;

/// Create a connected bridge: one sender for hook threads, one stream for
/// the scheduler.
pub fn channel() -> (EventSender, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventStream { rx })
}

/// Producer half of the bridge.
///
/// Cheap to clone; one clone per hook callback. `emit` never blocks, so
/// it is safe to call from latency-sensitive OS hook callbacks.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<ActivityEvent>,
}

impl EventSender {
    /// Enqueue one event.
    ///
    /// If the consuming side is gone the event is dropped silently - the
    /// bridge either delivers events or stays quiet, it never surfaces
    /// errors into hook callbacks.
    pub fn emit(&self, event: ActivityEvent) {
        if self.tx.send(event).is_err() {
            trace!("event dropped: bridge consumer is gone");
        }
    }

    /// True once the consuming [`EventStream`] has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of the bridge, owned by the single scheduler task.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<ActivityEvent>,
}

impl EventStream {
    /// Wait for the next event, giving up after `wait`.
    ///
    /// Returns `None` on timeout, or once every sender has been dropped
    /// and the backlog is drained. Both cases read as silence to the
    /// caller.
    pub async fn recv_timeout(&mut self, wait: Duration) -> Option<ActivityEvent> {
        match timeout(wait, self.rx.recv()).await {
            Ok(event) => event,
            Err(_) => None,
        }
    }

    /// True if no event is currently queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Number of events currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }
}
