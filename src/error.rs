//! # Editor errors
//!
//! None of these are fatal to the host. `InvalidRange` is a programming error
//! that callers recover from by clamping, the history signals only disable a
//! toolbar button, and the markup conditions are surfaced as [`Notice`]s.
use displaydoc::Display;
use thiserror::Error;

/// Error or signal from the editor core
#[derive(Debug, Clone, PartialEq, Eq, Error, Display)]
pub enum EditorError {
    /// Position {pos} is outside of the document (length {len})
    InvalidRange { pos: usize, len: usize },
    /// Could not read the content: {0}
    DeserializeFailed(String),
    /// Nothing to undo
    NothingToUndo,
    /// Nothing to redo
    NothingToRedo,
    /// Unsupported markup <{0}>
    UnsupportedMarkup(String),
}

/// A one-line, non-fatal message for the user
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Notice {
    /// Some formatting may not have loaded correctly
    FormattingDropped,
    /// The content could not be loaded
    ContentRejected,
}

impl EditorError {
    /// The notice to show for this condition, if the user should hear about it
    pub fn notice(&self) -> Option<Notice> {
        match self {
            EditorError::UnsupportedMarkup(_) => Some(Notice::FormattingDropped),
            EditorError::DeserializeFailed(_) => Some(Notice::ContentRejected),
            _ => None,
        }
    }
}
