//! Goal model - what is left to prove, and the consolidated view of it.

use serde::{Deserialize, Serialize};

use crate::message::WorkspaceDiagnostic;

/// An assumption available while proving a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hypothesis {
    /// Hypothesis name(s), e.g. `h` or `a b`
    pub expression: String,

    /// Rendered type of the hypothesis
    pub expression_type: String,
}

impl Hypothesis {
    /// Create a new hypothesis.
    pub fn new(expression: impl Into<String>, expression_type: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            expression_type: expression_type.into(),
        }
    }
}

/// A goal still to be proven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Rendered goal statement, including the turnstile
    pub goal: String,

    /// Hypotheses in document order
    pub hypotheses: Vec<Hypothesis>,
}

impl Goal {
    /// Create a goal without hypotheses.
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            hypotheses: Vec::new(),
        }
    }

    /// Add a hypothesis.
    pub fn with_hypothesis(mut self, hypothesis: Hypothesis) -> Self {
        self.hypotheses.push(hypothesis);
        self
    }
}

/// The consolidated goal view handed to the UI.
///
/// Every emission replaces the previous snapshot wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSnapshot {
    /// Errors and warnings for the current workspace
    pub diagnostics: Vec<WorkspaceDiagnostic>,

    /// Open goals
    pub goals: Vec<Goal>,

    /// Whether the proof is finished
    pub completed: bool,
}

impl GoalSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing is left: no goals and no diagnostics.
    pub fn is_clear(&self) -> bool {
        self.goals.is_empty() && self.diagnostics.is_empty()
    }
}
