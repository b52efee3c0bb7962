#![deny(clippy::cargo)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::nursery)]
#![deny(clippy::perf)]
#![deny(clippy::style)]
#![deny(clippy::suspicious)]
#![deny(clippy::pedantic)]

use serde::{Deserialize, Serialize};
use std::io;
use tabled::Tabled;
use thiserror::Error;

pub mod app;
pub mod backends;
pub mod setup;
pub mod ui;

pub use app::NoteStore;

// More convenient Result type
pub type Result<T> = std::result::Result<T, NoteError>;

/// Format of every note timestamp, in local time
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single note record, exactly as it is persisted
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub title: String,
    pub content: String,
    pub timestamp: String,
}

// Note without content. Displayed in lists
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Saved on")]
    pub timestamp: String,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            timestamp: note.timestamp.clone(),
        }
    }
}

/// Trait to be implemented by all backends that persist the note collection
pub trait NoteBackend {
    /// Reads the whole collection, in stored order.
    /// Storage that does not exist yet is an empty collection
    ///
    /// # Errors
    ///
    /// Returns an error if the storage exists but cannot be read or parsed
    fn load(&self) -> Result<Vec<Note>>;

    /// Replaces everything in storage with `notes`
    ///
    /// # Errors
    ///
    /// Returns an error if the collection could not be written
    fn save(&self, notes: &[Note]) -> Result<()>;
}

// Enum for all possible validation, backend or menu errors
#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Validation(#[from] NoteValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Menu(#[from] MenuError),
}

// Enum for all possible menu input errors
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Failed to read from stdin: {0}")]
    StdinReadError(io::Error),

    #[error("Failed writing to stdout")]
    StdoutWriteError(io::Error),

    #[error("Couldn't convert '{0}' to a number")]
    ParseError(String),

    #[error("No option with number {0}")]
    InvalidOption(usize),

    #[error("Reached end of input")]
    EndOfInput,
}

// Input checks done before anything reaches the store
#[derive(Debug, Error)]
pub enum NoteValidationError {
    #[error("Title is empty")]
    TitleEmpty,

    #[error("Content is empty")]
    ContentEmpty,
}

// Enum for all possible storage errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed creating temporary file for note data: {0}")]
    FileCreationError(io::Error),

    #[error("Failed writing note data to file: {0}")]
    FileWriteError(io::Error),

    #[error("Failed reading note data from file: {0}")]
    FileReadError(io::Error),

    #[error("Notes file is improperly formatted: {0}")]
    Malformed(serde_json::Error),

    #[error("Failed serializing notes: {0}")]
    SerializeError(serde_json::Error),

    #[error("Failed opening database")]
    DatabaseCreationError,

    #[error("Failed creating `notes` table in database")]
    TableCreationError,

    #[error("Database is locked or busy")]
    Timeout,

    #[error("Database file is not a valid SQLite database")]
    NotADatabase,

    #[error("Database schema has changed unexpectedly")]
    SchemaChanged,

    #[error("Insufficient permissions")]
    PermissionDenied,

    #[error(transparent)]
    Other(#[from] anyhow::Error), // Used as fallback
}
