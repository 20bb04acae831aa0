//! Editor buffer positions.

use serde::{Deserialize, Serialize};

/// Errors from position mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// Offset points past the last code point
    #[error("offset {offset} exceeds text length {len}")]
    OutOfRange {
        /// Requested offset
        offset: usize,
        /// Length of the text in code points
        len: usize,
    },
}

/// Map a code-point offset into `text` to a `(line, column)` pair.
///
/// Lines are 1-based. Code points are counted, not bytes. The column
/// advances once per code point preceding `offset` and restarts at 0
/// after each newline, so the first line is counted from 1 and later
/// lines from 0.
pub fn map_offset(text: &str, offset: usize) -> Result<(usize, usize), PositionError> {
    let mut line = 1;
    let mut column = 1;
    let mut chars = text.chars();
    let out_of_range = || PositionError::OutOfRange {
        offset,
        len: text.chars().count(),
    };

    for _ in 0..offset {
        match chars.next() {
            Some('\n') => {
                line += 1;
                column = 0;
            }
            Some(_) => column += 1,
            None => return Err(out_of_range()),
        }
    }

    // The offset itself must name a code point.
    if chars.next().is_none() {
        return Err(out_of_range());
    }

    Ok((line, column))
}

/// Cursor position in an edited buffer, tagged with its request cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChange {
    /// Full buffer contents
    pub code_file: String,

    /// Cursor line
    pub line: usize,

    /// Cursor column
    pub column: usize,

    /// Workspace sequence number of the edit
    pub workspace_seq: u64,
}

impl CodeChange {
    /// Build a code change from a buffer and a flat cursor offset.
    pub fn at_offset(
        code_file: impl Into<String>,
        offset: usize,
        workspace_seq: u64,
    ) -> Result<Self, PositionError> {
        let code_file = code_file.into();
        let (line, column) = map_offset(&code_file, offset)?;
        Ok(Self {
            code_file,
            line,
            column,
            workspace_seq,
        })
    }
}
