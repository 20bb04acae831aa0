//! Goalsync core data models.
//!
//! This crate defines the notifications received from a proof-assistant
//! connection and the consolidated goal view derived from them.

#![warn(missing_docs)]

// Diagnostics stream
mod message;

// Evaluation stream and recorded notifications
mod event;
mod widget;

// Consolidated view
mod goal;

// Editor positions
mod code;

// Re-exports
pub use message::{DiagnosticsBatch, Message, Severity, WorkspaceDiagnostic};
pub use event::{EvaluationResponse, Notification};
pub use widget::{AttributeValue, WidgetComponent, WidgetElement, WidgetNode, CLASS_NAME};
pub use goal::{Goal, GoalSnapshot, Hypothesis};
pub use code::{map_offset, CodeChange, PositionError};
