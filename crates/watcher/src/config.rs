//! Watcher configuration.

use serde::{Deserialize, Serialize};

/// Wire conventions the watcher relies on.
///
/// The defaults match the sentinel and terminal-state strings emitted by
/// the proof assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Caption of the end-of-batch sentinel message
    pub eof_caption: String,
    /// Text prefix of the sentinel, followed directly by the sequence number
    pub eof_prefix: String,
    /// Evaluation state reported once every goal is closed
    pub terminal_state: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            eof_caption: "print result".to_string(),
            eof_prefix: "EOF".to_string(),
            terminal_state: "no goals".to_string(),
        }
    }
}

impl WatcherConfig {
    /// Render the sentinel text for a sequence number, e.g. `EOF42`.
    pub fn sentinel_text(&self, seq: u64) -> String {
        format!("{}{}", self.eof_prefix, seq)
    }
}
