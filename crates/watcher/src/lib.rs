//! Goal watcher (dual-stream synchronization)
//!
//! Reconciles the diagnostics stream and the evaluation stream of a
//! proof-assistant connection into one consolidated goal snapshot.

#![warn(missing_docs)]

pub mod config;
pub mod sink;
pub mod watcher;
pub mod driver;

pub use config::WatcherConfig;
pub use sink::{ChannelSink, SnapshotSink};
pub use watcher::{parse_eof_sequence, GoalWatcher};
pub use driver::{drive, DriverError, WatcherHandle};
