//! Idlewatch - adaptive idle/presence detection core.
//!
//! This library classifies a stream of timestamped input events
//! (keyboard/mouse activity) into recurring activity/inactivity rollups,
//! at a pace that adapts to how recently the user was active, and
//! broadcasts those rollups to independent consumers.
//!
//! # Architecture
//!
//! ```text
//! hook threads          single cooperative scheduler
//! ┌──────────┐   ┌──────────────────────────────────────────┐
//! │ producer │   │  ┌─────────┐   ┌───────────┐   ┌───────┐ │   ┌──────────┐
//! │ callbacks├──▶│  │ Monitor │──▶│ Scheduler │──▶│Fanout │─┼──▶│ consumer │
//! └──────────┘   │  │ (drain) │   │ (pacing)  │   │ (tee) │ │   │ queues ×N│
//!    EventSender │  └─────────┘   └───────────┘   └───────┘ │   └──────────┘
//!                └──────────────────────────────────────────┘
//! ```
//!
//! The bridge in [`source`] is the only place where true multi-thread
//! concurrency exists; everything downstream runs on one cooperative
//! scheduler and owns its state outright.
//!
//! # Example
//!
//! ```no_run
//! use idlewatch::{Config, Fanout, RollupScheduler};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() {
//! let config = Config::default();
//! let (sender, stream) = idlewatch::source::channel();
//!
//! // Hook callbacks clone `sender` and emit events from their threads.
//! sender.emit(idlewatch::ActivityEvent::moved());
//!
//! let (scheduler, rollups) = RollupScheduler::new(stream, &config);
//! let (fanout, consumers) = Fanout::new(rollups, config.fanout, config.channel_capacity);
//!
//! let shutdown = CancellationToken::new();
//! tokio::spawn(scheduler.run(shutdown.clone()));
//! tokio::spawn(fanout.run(shutdown.clone()));
//! // each receiver in `consumers` now yields every rollup, in order
//! # }
//! ```

pub mod config;
pub mod core;
pub mod source;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use core::{ActivityMonitor, ActivityRollup, Classification, Fanout, RollupScheduler};
pub use source::{ActivityEvent, ActivityKind, EventSender, EventStream};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
