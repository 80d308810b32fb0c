//! Fan-out broadcaster: one source queue duplicated into N destinations.
//!
//! The loop takes one item from the source, then appends it to all
//! destinations concurrently and waits for every append to finish before
//! taking the next item. Every destination sees every item exactly once,
//! in source order, and the slowest consumer throttles all of them
//! equally - there is no per-consumer buffering beyond each destination
//! queue's own capacity.

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Broadcaster over any cloneable item stream.
pub struct Fanout<T> {
    source: mpsc::Receiver<T>,
    destinations: Vec<mpsc::Sender<T>>,
}

impl<T: Clone> Fanout<T> {
    /// Create a broadcaster with `n` destination queues of the given
    /// capacity, returning their receiving halves.
    ///
    /// `n` and `capacity` are clamped to at least 1.
    pub fn new(
        source: mpsc::Receiver<T>,
        n: usize,
        capacity: usize,
    ) -> (Self, Vec<mpsc::Receiver<T>>) {
        let (destinations, outputs): (Vec<_>, Vec<_>) = (0..n.max(1))
            .map(|_| mpsc::channel(capacity.max(1)))
            .unzip();
        (
            Self {
                source,
                destinations,
            },
            outputs,
        )
    }

    /// Number of destination queues.
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Always false; a broadcaster has at least one destination.
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Run until cancelled, the source closes, or a destination's
    /// consumer goes away.
    ///
    /// A dropped destination receiver is treated as pipeline teardown:
    /// the loop ends and the remaining destination queues close, so no
    /// destination can silently fall out of step with the others.
    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            let item = tokio::select! {
                _ = shutdown.cancelled() => break,
                item = self.source.recv() => match item {
                    Some(item) => item,
                    None => break,
                },
            };

            // An in-progress append is never abandoned mid-flight: either
            // every destination accepts the item or the loop ends. Only
            // the wait for the next source item is cancellable.
            let results = join_all(
                self.destinations
                    .iter()
                    .map(|destination| destination.send(item.clone())),
            )
            .await;

            if results.iter().any(|sent| sent.is_err()) {
                debug!("destination consumer gone, broadcaster stopping");
                break;
            }
        }
    }
}
