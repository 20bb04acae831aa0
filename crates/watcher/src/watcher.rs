//! The goal watcher state machine.
//!
//! A listening session is keyed by the workspace sequence number of one
//! edit/request cycle. The diagnostics stream and the evaluation stream
//! report into it independently; nothing becomes visible until both have
//! reported at least once. From then on every inbound notification
//! re-emits the snapshot, changed or not.

use std::sync::OnceLock;

use goalsync_core::{
    DiagnosticsBatch, EvaluationResponse, GoalSnapshot, Message, Notification, Severity,
    WorkspaceDiagnostic,
};
use goalsync_widget::extract_goals;
use regex::Regex;
use tracing::{debug, info, trace};

use crate::config::WatcherConfig;
use crate::sink::SnapshotSink;

/// Parse the sequence number following the sentinel prefix.
///
/// Leniently takes the leading digits (after optional whitespace and
/// `+`). Returns `None` when there are none.
pub fn parse_eof_sequence(remainder: &str) -> Option<u64> {
    static LEADING_DIGITS: OnceLock<Option<Regex>> = OnceLock::new();
    let re = LEADING_DIGITS
        .get_or_init(|| Regex::new(r"^\s*\+?(\d+)").ok())
        .as_ref()?;

    re.captures(remainder)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Synchronizes diagnostics and evaluation notifications into snapshots.
pub struct GoalWatcher {
    config: WatcherConfig,
    /// Sequence number of the current session
    workspace_seq: u64,
    /// Highest evaluation sequence number accepted this session
    last_eval_seq: Option<u64>,
    /// Last accepted evaluation reported the terminal state
    terminal_reached: bool,
    diagnostics_ready: bool,
    evaluation_ready: bool,
    snapshot: GoalSnapshot,
    sink: Option<Box<dyn SnapshotSink + Send>>,
}

impl Default for GoalWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GoalWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalWatcher")
            .field("config", &self.config)
            .field("workspace_seq", &self.workspace_seq)
            .field("last_eval_seq", &self.last_eval_seq)
            .field("terminal_reached", &self.terminal_reached)
            .field("diagnostics_ready", &self.diagnostics_ready)
            .field("evaluation_ready", &self.evaluation_ready)
            .field("snapshot", &self.snapshot)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl GoalWatcher {
    /// Create a watcher with no sink, listening on sequence 0.
    pub fn new() -> Self {
        Self {
            config: WatcherConfig::default(),
            workspace_seq: 0,
            last_eval_seq: None,
            terminal_reached: false,
            diagnostics_ready: false,
            evaluation_ready: false,
            snapshot: GoalSnapshot::default(),
            sink: None,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: WatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the snapshot sink.
    pub fn with_sink(mut self, sink: impl SnapshotSink + Send + 'static) -> Self {
        self.set_sink(sink);
        self
    }

    /// Replace the snapshot sink.
    pub fn set_sink(&mut self, sink: impl SnapshotSink + Send + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Remove the snapshot sink. State keeps updating.
    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    /// Get current configuration.
    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Sequence number of the current session.
    pub fn workspace_seq(&self) -> u64 {
        self.workspace_seq
    }

    /// Whether both streams have reported in the current session.
    pub fn is_synchronized(&self) -> bool {
        self.diagnostics_ready && self.evaluation_ready
    }

    /// Current state, with `completed` computed, without emitting.
    pub fn snapshot(&self) -> GoalSnapshot {
        let mut snapshot = self.snapshot.clone();
        snapshot.completed = self.is_completed();
        snapshot
    }

    /// Start a new listening session, discarding everything accumulated.
    pub fn start_listen(&mut self, seq: u64) {
        info!("Listening for workspace sequence {}", seq);
        self.workspace_seq = seq;
        self.last_eval_seq = None;
        self.terminal_reached = false;
        self.diagnostics_ready = false;
        self.evaluation_ready = false;
        self.snapshot = GoalSnapshot::default();
    }

    /// Consume one diagnostics batch.
    ///
    /// The batch is applied only if its sentinel carries the current
    /// sequence number. A batch without a sentinel counts as sequence 0.
    pub fn handle_diagnostics(&mut self, batch: &DiagnosticsBatch) {
        let seq = self.batch_sequence(batch);
        if seq != Some(self.workspace_seq) {
            debug!(
                "Dropping diagnostics batch for sequence {:?} (expecting {:?})",
                seq,
                self.config.sentinel_text(self.workspace_seq)
            );
            return;
        }

        for message in batch.iter().filter(|message| message.is_diagnostic()) {
            trace!(
                "Accepting {} at line {}: {}",
                message.severity.as_str(),
                message.line,
                message.text
            );
            self.snapshot.diagnostics.push(WorkspaceDiagnostic::from(message));
        }
        self.diagnostics_ready = true;

        self.emit_if_synchronized();
    }

    /// Consume one evaluation response.
    ///
    /// Goals follow every widget payload. The terminal-state flag only
    /// follows responses newer than the last accepted one.
    pub fn handle_evaluation(&mut self, response: &EvaluationResponse) {
        if let Some(widget) = &response.widget {
            self.snapshot.goals = extract_goals(widget);
        }

        let is_newer = self
            .last_eval_seq
            .map_or(true, |last| response.sequence_number > last);

        if is_newer {
            self.last_eval_seq = Some(response.sequence_number);
            if let Some(state) = &response.state {
                self.terminal_reached = *state == self.config.terminal_state;
            }
        } else {
            debug!(
                "Stale evaluation response {} (last accepted {:?})",
                response.sequence_number, self.last_eval_seq
            );
        }
        self.evaluation_ready = true;

        self.emit_if_synchronized();
    }

    /// Dispatch a recorded notification.
    pub fn handle(&mut self, notification: &Notification) {
        match notification {
            Notification::StartListen { seq } => self.start_listen(*seq),
            Notification::Diagnostics(batch) => self.handle_diagnostics(batch),
            Notification::Evaluation(response) => self.handle_evaluation(response),
        }
    }

    fn is_sentinel(&self, message: &Message) -> bool {
        message.severity == Severity::Information
            && message.caption == self.config.eof_caption
            && message.text.starts_with(&self.config.eof_prefix)
    }

    /// Sequence number carried by the batch sentinel.
    ///
    /// `Some(0)` without a sentinel, `None` when the sentinel is malformed.
    fn batch_sequence(&self, batch: &DiagnosticsBatch) -> Option<u64> {
        match batch.iter().find(|message| self.is_sentinel(message)) {
            Some(sentinel) => parse_eof_sequence(&sentinel.text[self.config.eof_prefix.len()..]),
            None => Some(0),
        }
    }

    fn is_completed(&self) -> bool {
        self.terminal_reached && self.snapshot.is_clear()
    }

    fn emit_if_synchronized(&mut self) {
        if self.is_synchronized() {
            self.emit();
        }
    }

    fn emit(&mut self) {
        self.snapshot.completed = self.is_completed();
        trace!(
            "Emitting snapshot: {} goals, {} diagnostics, completed={}",
            self.snapshot.goals.len(),
            self.snapshot.diagnostics.len(),
            self.snapshot.completed
        );

        if let Some(sink) = self.sink.as_mut() {
            sink.on_snapshot(self.snapshot.clone());
        }
    }
}
