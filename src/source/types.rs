//! Raw input event types delivered by external input hooks.
//!
//! The core never interprets event payloads - it only cares about the
//! timestamp and the kind of input that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of input event kinds an external hook can report.
///
/// This is a closed enumeration: hooks observe mouse motion, clicks,
/// scrolling, and key presses/releases, and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Mouse movement
    Move,
    /// Mouse button click
    Click,
    /// Scroll wheel event
    Scroll,
    /// Key press
    Press,
    /// Key release
    Release,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActivityKind::Move => "move",
            ActivityKind::Click => "click",
            ActivityKind::Scroll => "scroll",
            ActivityKind::Press => "press",
            ActivityKind::Release => "release",
        };
        f.write_str(s)
    }
}

/// A single raw input event.
///
/// Immutable once created. Produced by hook callbacks on arbitrary
/// threads, consumed exactly once by the [`ActivityMonitor`](crate::core::ActivityMonitor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Timestamp when the event occurred
    pub time: DateTime<Utc>,
    /// Kind of input that produced the event
    pub kind: ActivityKind,
    /// Hook-specific arguments, carried through opaquely
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl ActivityEvent {
    /// Create an event of the given kind stamped with the current time.
    pub fn new(kind: ActivityKind) -> Self {
        Self {
            time: Utc::now(),
            kind,
            payload: serde_json::Value::Null,
        }
    }

    /// Create a mouse movement event.
    pub fn moved() -> Self {
        Self::new(ActivityKind::Move)
    }

    /// Create a mouse click event.
    pub fn click() -> Self {
        Self::new(ActivityKind::Click)
    }

    /// Create a scroll event.
    pub fn scroll() -> Self {
        Self::new(ActivityKind::Scroll)
    }

    /// Create a key press event.
    pub fn press() -> Self {
        Self::new(ActivityKind::Press)
    }

    /// Create a key release event.
    pub fn release() -> Self {
        Self::new(ActivityKind::Release)
    }

    /// Attach an opaque payload to the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Create an event of the given kind at an explicit timestamp.
    pub fn at(time: DateTime<Utc>, kind: ActivityKind) -> Self {
        Self {
            time,
            kind,
            payload: serde_json::Value::Null,
        }
    }
}
