use crate::notes::{FolderRepository, MemoryRepository, NoteError, NoteRepository};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Where notes are saved
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Folder {
    /// The directory to save the notes to. Without it notes are kept in memory.
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
}

impl Folder {
    /// Open the repository this folder describes
    pub fn open(&self) -> Result<Box<dyn NoteRepository>, NoteError> {
        match &self.save_dir {
            Some(dir) => {
                info!("Saving notes to {:?}", dir);
                Ok(Box::new(FolderRepository::open(dir)?))
            }
            None => {
                info!("Keeping notes in memory");
                Ok(Box::new(MemoryRepository::default()))
            }
        }
    }
}
