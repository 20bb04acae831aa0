//! Diagnostics model - messages reported by the proof assistant.

use serde::{Deserialize, Serialize};

/// Message severity as reported by the proof assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational output (`#print`, `#eval`, sentinels)
    Information,
    /// Warning
    Warning,
    /// Error
    Error,
}

impl Severity {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Information => "information",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message severity
    pub severity: Severity,

    /// Short caption, e.g. `"print result"`
    #[serde(default)]
    pub caption: String,

    /// Message body
    pub text: String,

    /// 1-based line the message points at
    #[serde(rename = "pos_line")]
    pub line: u32,

    /// Column the message points at
    #[serde(rename = "pos_col", default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,

    /// Source file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Message {
    /// Create a new message.
    pub fn new(
        severity: Severity,
        caption: impl Into<String>,
        text: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            severity,
            caption: caption.into(),
            text: text.into(),
            line,
            column: None,
            file_name: None,
        }
    }

    /// Create an error message.
    pub fn error(text: impl Into<String>, line: u32) -> Self {
        Self::new(Severity::Error, "", text, line)
    }

    /// Create a warning message.
    pub fn warning(text: impl Into<String>, line: u32) -> Self {
        Self::new(Severity::Warning, "", text, line)
    }

    /// Create an informational message.
    pub fn information(caption: impl Into<String>, text: impl Into<String>, line: u32) -> Self {
        Self::new(Severity::Information, caption, text, line)
    }

    /// Whether this message should surface as a workspace diagnostic.
    pub fn is_diagnostic(&self) -> bool {
        self.severity != Severity::Information
    }
}

/// One batch of messages from the diagnostics stream.
///
/// The batch carries its sequence number implicitly, inside an
/// end-of-batch sentinel message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsBatch {
    /// Messages in emission order
    #[serde(default)]
    pub msgs: Vec<Message>,
}

impl DiagnosticsBatch {
    /// Create a batch from messages.
    pub fn new(msgs: Vec<Message>) -> Self {
        Self { msgs }
    }

    /// Iterate over messages in batch order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.msgs.iter()
    }
}

/// A diagnostic as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDiagnostic {
    /// Line the diagnostic points at
    pub line: u32,

    /// Message text
    pub message: String,
}

impl From<&Message> for WorkspaceDiagnostic {
    fn from(message: &Message) -> Self {
        Self {
            line: message.line,
            message: message.text.clone(),
        }
    }
}
