use super::{sort_newest_first, validate, Note, NoteError, NoteId, NoteRepository};
use crate::util::Counter;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Notes stored as one JSON file per note (`<id>.json`) in a directory
#[derive(Debug)]
pub struct FolderRepository {
    dir: PathBuf,
    next_id: Counter<NoteId>,
}

impl FolderRepository {
    /// Open the directory, creating it if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, NoteError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let mut repo = FolderRepository {
            dir,
            next_id: Counter::default(),
        };
        let next = repo
            .ids()?
            .into_iter()
            .map(|id| id.int_val() + 1)
            .max()
            .unwrap_or(0);
        repo.next_id = Counter::starting_at(next);
        debug!("Opened note folder {:?}", repo.dir);
        Ok(repo)
    }

    fn path(&self, id: NoteId) -> PathBuf {
        self.dir.join(format!("{}.json", id.int_val()))
    }

    fn ids(&self) -> Result<Vec<NoteId>, NoteError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()).map(str::parse::<NoteId>) {
                Some(Ok(id)) => ids.push(id),
                _ => warn!("Ignoring {:?} in the note folder", path),
            }
        }
        Ok(ids)
    }

    fn write(&self, note: &Note) -> Result<(), NoteError> {
        let json = serde_json::to_string_pretty(note)?;
        fs::write(self.path(note.id), json)?;
        Ok(())
    }
}

impl NoteRepository for FolderRepository {
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
        self.write(&note)?;
        debug!("Created {}", note.id);
        Ok(note)
    }

    fn list(&self) -> Result<Vec<Note>, NoteError> {
        let mut notes = self
            .ids()?
            .into_iter()
            .map(|id| self.get(id))
            .collect::<Result<Vec<_>, _>>()?;
        sort_newest_first(&mut notes);
        Ok(notes)
    }

    fn get(&self, id: NoteId) -> Result<Note, NoteError> {
        match fs::read_to_string(self.path(id)) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(NoteError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    fn update(&mut self, id: NoteId, title: &str, content: &str) -> Result<Note, NoteError> {
        let title = validate(title, content)?;
        let mut note = self.get(id)?;
        note.title = title.to_owned();
        note.content = content.to_owned();
        note.updated_at = Utc::now();
        self.write(&note)?;
        Ok(note)
    }

    fn delete(&mut self, id: NoteId) -> Result<(), NoteError> {
        match fs::remove_file(self.path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(NoteError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}
