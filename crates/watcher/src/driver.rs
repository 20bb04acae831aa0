//! Async driver feeding notifications to a watcher.
//!
//! The watcher itself is synchronous and assumes exclusive access. The
//! driver owns it inside one task and applies notifications one at a time
//! in arrival order, so producers on any thread only need a sender.

use goalsync_core::Notification;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::watcher::GoalWatcher;

/// Errors from the watcher task.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The watcher task is no longer receiving
    #[error("watcher task has stopped")]
    Stopped,

    /// The watcher task panicked or was cancelled
    #[error("watcher task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Apply notifications from `rx` until every sender is dropped.
///
/// Returns the watcher so its final state can be inspected.
pub async fn drive(
    mut watcher: GoalWatcher,
    mut rx: mpsc::UnboundedReceiver<Notification>,
) -> GoalWatcher {
    let mut handled = 0usize;
    while let Some(notification) = rx.recv().await {
        debug!("Handling {} notification", notification.kind());
        watcher.handle(&notification);
        handled += 1;
    }

    info!("Notification stream closed after {} notifications", handled);
    watcher
}

/// Handle to a watcher running in its own task.
#[derive(Debug)]
pub struct WatcherHandle {
    tx: mpsc::UnboundedSender<Notification>,
    task: JoinHandle<GoalWatcher>,
}

impl WatcherHandle {
    /// Spawn `watcher` onto the current runtime.
    pub fn spawn(watcher: GoalWatcher) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(drive(watcher, rx));
        Self { tx, task }
    }

    /// A sender for producers of notifications.
    pub fn sender(&self) -> mpsc::UnboundedSender<Notification> {
        self.tx.clone()
    }

    /// Queue a notification.
    pub fn notify(&self, notification: Notification) -> Result<(), DriverError> {
        self.tx.send(notification).map_err(|_| DriverError::Stopped)
    }

    /// Close the stream and wait for the watcher to drain it.
    ///
    /// Other senders obtained through [`WatcherHandle::sender`] must be
    /// dropped as well, or this waits for them.
    pub async fn shutdown(self) -> Result<GoalWatcher, DriverError> {
        drop(self.tx);
        Ok(self.task.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatcherConfig;
    use crate::sink::ChannelSink;
    use goalsync_core::{DiagnosticsBatch, EvaluationResponse, Message};

    fn sentinel_batch(seq: u64, mut msgs: Vec<Message>) -> Notification {
        let sentinel = WatcherConfig::default().sentinel_text(seq);
        msgs.push(Message::information("print result", sentinel, 1));
        Notification::Diagnostics(DiagnosticsBatch::new(msgs))
    }

    #[tokio::test]
    async fn test_drive_applies_in_order() {
        let (sink, mut snapshots) = ChannelSink::channel();
        let (tx, rx) = mpsc::unbounded_channel();

        tx.send(Notification::StartListen { seq: 2 }).unwrap();
        tx.send(sentinel_batch(2, vec![Message::error("e", 3)])).unwrap();
        tx.send(Notification::Evaluation(EvaluationResponse::new(1).with_state("no goals")))
            .unwrap();
        drop(tx);

        let watcher = drive(GoalWatcher::new().with_sink(sink), rx).await;

        assert_eq!(watcher.workspace_seq(), 2);
        let snapshot = snapshots.recv().await.unwrap();
        assert_eq!(snapshot.diagnostics.len(), 1);
        assert!(!snapshot.completed);
    }

    #[tokio::test]
    async fn test_handle_round_trip() {
        let (sink, mut snapshots) = ChannelSink::channel();
        let handle = WatcherHandle::spawn(GoalWatcher::new().with_sink(sink));

        handle.notify(Notification::StartListen { seq: 1 }).unwrap();
        handle.notify(sentinel_batch(1, vec![])).unwrap();
        handle
            .notify(Notification::Evaluation(EvaluationResponse::new(1).with_state("no goals")))
            .unwrap();

        let watcher = handle.shutdown().await.unwrap();
        assert!(watcher.snapshot().completed);
        assert!(snapshots.recv().await.unwrap().completed);
    }

    #[tokio::test]
    async fn test_sender_from_other_task() {
        let handle = WatcherHandle::spawn(GoalWatcher::new());
        let tx = handle.sender();

        tokio::spawn(async move {
            tx.send(Notification::StartListen { seq: 9 }).unwrap();
        })
        .await
        .unwrap();

        let watcher = handle.shutdown().await.unwrap();
        assert_eq!(watcher.workspace_seq(), 9);
    }
}
