//! Snapshot delivery.

use goalsync_core::GoalSnapshot;
use tokio::sync::mpsc;
use tracing::debug;

/// Receiver of consolidated goal snapshots.
///
/// Each snapshot supersedes the previous one entirely.
pub trait SnapshotSink {
    /// Deliver a snapshot.
    fn on_snapshot(&mut self, snapshot: GoalSnapshot);
}

impl<F> SnapshotSink for F
where
    F: FnMut(GoalSnapshot),
{
    fn on_snapshot(&mut self, snapshot: GoalSnapshot) {
        self(snapshot)
    }
}

/// Sink forwarding snapshots into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<GoalSnapshot>,
}

impl ChannelSink {
    /// Wrap a channel sender.
    pub fn new(tx: mpsc::UnboundedSender<GoalSnapshot>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<GoalSnapshot>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl SnapshotSink for ChannelSink {
    fn on_snapshot(&mut self, snapshot: GoalSnapshot) {
        if self.tx.send(snapshot).is_err() {
            debug!("Snapshot receiver dropped, discarding snapshot");
        }
    }
}
