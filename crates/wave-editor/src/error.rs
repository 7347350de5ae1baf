//! Editor error taxonomy.
//!
//! No variant is fatal: every failure leaves the document as it was.
//! [`DanglingReference`](EditorError::DanglingReference) and
//! [`OutOfRange`](EditorError::OutOfRange) are absorbed by
//! [`Editor::execute`](crate::Editor::execute); the others reach the caller.

use std::fmt;

use thiserror::Error;
use wave_core::WaveError;

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Which history stack an operation tried to pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryDirection::Undo => f.write_str("undo"),
            HistoryDirection::Redo => f.write_str("redo"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EditorError {
    /// Imported payload failed structural validation.
    #[error("Invalid document: {0}")]
    Schema(String),
    /// Undo or redo requested with an empty stack.
    #[error("Nothing to {0}")]
    EmptyHistory(HistoryDirection),
    /// A wave or point targeted by an edit no longer exists.
    #[error("Dangling reference: {0}")]
    DanglingReference(String),
    /// The coordinate transform could not convert a position.
    #[error("Coordinate out of range: {0}")]
    OutOfRange(&'static str),
    /// Export serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    /// Errors that degrade to a skipped event instead of reaching the UI.
    pub fn is_local(&self) -> bool {
        matches!(self, EditorError::DanglingReference(_) | EditorError::OutOfRange(_))
    }
}

impl From<WaveError> for EditorError {
    fn from(err: WaveError) -> Self {
        EditorError::DanglingReference(err.to_string())
    }
}
