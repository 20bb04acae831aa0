//! Widget tree traversal and goal extraction.
//!
//! Walks the rendered tactic-state markup and recovers goals and
//! hypotheses from its class-name conventions.

#![warn(missing_docs)]

pub mod walker;
pub mod extract;

pub use walker::{walk, ElementWalker, Visit};
pub use extract::{
    extract_goals, goal_of, goals, hypotheses, hypothesis_of, text_content, Goals,
    GOAL_HYP, GOAL_HYP_TYPE, GOAL_VDASH, TURNSTILE,
};
