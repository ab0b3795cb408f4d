use super::{sort_newest_first, validate, Note, NoteError, NoteId, NoteRepository};
use crate::util::Counter;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::debug;

/// Notes held in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryRepository {
    next_id: Counter<NoteId>,
    notes: BTreeMap<NoteId, Note>,
}

impl NoteRepository for MemoryRepository {
    fn create(&mut self, title: &str, content: &str) -> Result<Note, NoteError> {
        let title = validate(title, content)?;
        let now = Utc::now();
        let note = Note {
            id: self.next_id.next(),
            title: title.to_owned(),
            content: content.to_owned(),
            created_at: now,
            updated_at: now,
        };
        debug!("Created {}", note.id);
        self.notes.insert(note.id, note.clone());
        Ok(note)
    }

    fn list(&self) -> Result<Vec<Note>, NoteError> {
        let mut notes: Vec<Note> = self.notes.values().cloned().collect();
        sort_newest_first(&mut notes);
        Ok(notes)
    }

    fn get(&self, id: NoteId) -> Result<Note, NoteError> {
        self.notes.get(&id).cloned().ok_or(NoteError::NotFound(id))
    }

    fn update(&mut self, id: NoteId, title: &str, content: &str) -> Result<Note, NoteError> {
        let title = validate(title, content)?;
        let note = self.notes.get_mut(&id).ok_or(NoteError::NotFound(id))?;
        note.title = title.to_owned();
        note.content = content.to_owned();
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    fn delete(&mut self, id: NoteId) -> Result<(), NoteError> {
        self.notes
            .remove(&id)
            .map(|_| ())
            .ok_or(NoteError::NotFound(id))
    }
}
