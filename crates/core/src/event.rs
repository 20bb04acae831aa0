//! Notification model - what arrives from the proof-assistant connection.

use serde::{Deserialize, Serialize};

use crate::message::DiagnosticsBatch;
use crate::widget::WidgetNode;

/// Response of the evaluation stream: the proof state at the cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    /// Sequence number assigned by the connection
    #[serde(rename = "seq_num")]
    pub sequence_number: u64,

    /// Plain-text state, `"no goals"` once the proof is finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Rendered widget tree of the state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetNode>,
}

impl EvaluationResponse {
    /// Create a response with neither state nor widget.
    pub fn new(sequence_number: u64) -> Self {
        Self {
            sequence_number,
            state: None,
            widget: None,
        }
    }

    /// Set the textual state.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the widget tree.
    pub fn with_widget(mut self, widget: impl Into<WidgetNode>) -> Self {
        self.widget = Some(widget.into());
        self
    }
}

/// One inbound notification, as recorded from a live connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// A new edit/request cycle began
    StartListen {
        /// Workspace sequence number of the cycle
        seq: u64,
    },

    /// Diagnostics stream batch
    Diagnostics(DiagnosticsBatch),

    /// Evaluation stream response
    Evaluation(EvaluationResponse),
}

impl Notification {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::StartListen { .. } => "start_listen",
            Notification::Diagnostics(_) => "diagnostics",
            Notification::Evaluation(_) => "evaluation",
        }
    }
}
