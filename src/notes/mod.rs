//! # Notes
//!
//! The store the editor's content ends up in. A note's content is the markup
//! the editor emits; the store never looks inside it.
mod folder;
mod memory;

pub use folder::FolderRepository;
pub use memory::MemoryRepository;

use chrono::{DateTime, Utc};
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

crate::make_id!(
    /// ID of a note
    NoteId,
    "note#{0}"
);

/// The longest title accepted, in characters
pub const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// The note body as markup
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rejected title or content
#[derive(Debug, Clone, PartialEq, Eq, Error, Display)]
pub enum ValidationError {
    /// The title must not be empty
    EmptyTitle,
    /// The title is {0} characters long (at most 255 are allowed)
    TitleTooLong(usize),
    /// The content must not be empty
    EmptyContent,
}

/// Error from a note repository
#[derive(Debug, Error, Display)]
pub enum NoteError {
    /// {0} does not exist
    NotFound(NoteId),
    /// Invalid note: {0}
    Validation(#[from] ValidationError),
    /// Could not access the note store: {0}
    Io(#[from] std::io::Error),
    /// Could not encode or decode a note: {0}
    Json(#[from] serde_json::Error),
}

/// Check title and content, returning the trimmed title
pub fn validate<'a>(title: &'a str, content: &str) -> Result<&'a str, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong(len));
    }
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(title)
}

/// Newest first; notes created at the same instant by descending id
pub(crate) fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Where notes are kept
pub trait NoteRepository {
    fn create(&mut self, title: &str, content: &str) -> Result<Note, NoteError>;
    /// All notes, newest first
    fn list(&self) -> Result<Vec<Note>, NoteError>;
    fn get(&self, id: NoteId) -> Result<Note, NoteError>;
    fn update(&mut self, id: NoteId, title: &str, content: &str) -> Result<Note, NoteError>;
    fn delete(&mut self, id: NoteId) -> Result<(), NoteError>;
}
