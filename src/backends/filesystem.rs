use super::{BackendError, Note, NoteBackend, NoteError, Result};
use log::{debug, trace};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Keeps the whole collection as one JSON array in a single file
#[derive(Debug)]
pub struct FilesystemBackend {
    path: PathBuf,
}

impl FilesystemBackend {
    /// Creates a backend for the notes file at `path`. The file is not touched until the first load or save
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Using notes file: {}", path.display());
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the temporary file is created in, so the final rename stays on one filesystem
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl NoteBackend for FilesystemBackend {
    /// Reads and parses the notes file
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `BackendError::FileReadError` if the file exists but cannot be read
    /// - `BackendError::Malformed` if the file is not a JSON array of notes
    fn load(&self) -> Result<Vec<Note>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No notes file at {} yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(NoteError::Backend(BackendError::FileReadError(e))),
        };

        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let notes: Vec<Note> = serde_json::from_str(&data)
            .map_err(|e| NoteError::Backend(BackendError::Malformed(e)))?;
        trace!("Read {} notes from {}", notes.len(), self.path.display());
        Ok(notes)
    }

    /// Writes the collection to a temporary file next to the target, then renames it into place
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `BackendError::SerializeError` if the notes cannot be encoded
    /// - `BackendError::FileCreationError` if the temporary file cannot be created
    /// - `BackendError::FileWriteError` if writing, syncing, copying permissions or renaming fails
    fn save(&self, notes: &[Note]) -> Result<()> {
        let data = serde_json::to_string_pretty(notes)
            .map_err(|e| NoteError::Backend(BackendError::SerializeError(e)))?;

        let mut tmp = NamedTempFile::new_in(self.parent_dir())
            .map_err(|e| NoteError::Backend(BackendError::FileCreationError(e)))?;
        tmp.write_all(data.as_bytes())
            .map_err(|e| NoteError::Backend(BackendError::FileWriteError(e)))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| NoteError::Backend(BackendError::FileWriteError(e)))?;

        // Temp files are created 0600, carry over the mode of the file being replaced
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| NoteError::Backend(BackendError::FileWriteError(e)))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| NoteError::Backend(BackendError::FileWriteError(e.error)))?;
        trace!("Wrote {} notes to {}", notes.len(), self.path.display());
        Ok(())
    }
}
