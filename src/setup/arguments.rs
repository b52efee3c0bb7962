use crate::app::NoteStore;
use crate::backends::{FilesystemBackend, SqliteBackend};
use crate::{NoteBackend, Result};

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

/// Default notes file, relative to the working directory
pub const DEFAULT_NOTES_FILE: &str = "notes.json";

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
pub struct Args {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub backend: Option<Backend>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Keep notes in a single JSON file (default)
    Json {
        #[arg(short, long, default_value = DEFAULT_NOTES_FILE)]
        path: String,
    },
    /// Keep notes in an SQLite database
    Sqlite {
        #[arg(short, long)]
        path: String,
    },
}

impl Default for Backend {
    fn default() -> Self {
        Self::Json {
            path: DEFAULT_NOTES_FILE.to_string(),
        }
    }
}

impl Args {
    /// Log level picked by the number of `-v` flags
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Builds the chosen backend and loads the note store from it.
    ///
    /// # Errors
    ///
    /// Forwards errors from opening the backend or loading existing notes
    pub fn open_store(&self) -> Result<NoteStore> {
        // Allow any struct that implements NoteBackend, and store on heap because size is unknown at compile time
        let repo: Box<dyn NoteBackend> = match self.backend.clone().unwrap_or_default() {
            Backend::Json { path } => Box::new(FilesystemBackend::new(path)),
            Backend::Sqlite { path } => Box::new(SqliteBackend::new(&path)?),
        };
        NoteStore::open(repo)
    }
}

/// Parses command-line arguments
#[must_use]
pub fn handle_args() -> Args {
    Args::parse()
}
