use super::{BackendError, Note, NoteBackend, NoteError, Result};
use log::{debug, trace};
use rusqlite::{Connection, Error as SqliteError, ErrorCode, params};

#[derive(Debug)]
pub struct SqliteBackend {
    connection: Connection,
}

impl SqliteBackend {
    /// Creates a new `SqliteBackend` by opening the `SQLite` database at the given path.
    /// Also ensures that the `notes` table exists.
    ///
    /// # Errors
    ///
    /// `BackendError::DatabaseCreationError` if the database file cannot be opened
    /// `BackendError::TableCreationError` if the `notes` table cannot be created.
    pub fn new(path: &str) -> Result<Self> {
        let connection = Connection::open(path)
            .map_err(|_| NoteError::Backend(BackendError::DatabaseCreationError))?;
        debug!("Opened connection to db: {}", &path);

        // `position` keeps collection order, titles may repeat
        connection
            .execute(
                "
                CREATE TABLE IF NOT EXISTS notes (
                    position  INTEGER PRIMARY KEY,
                    title     TEXT NOT NULL,
                    content   TEXT NOT NULL,
                    timestamp TEXT NOT NULL
                )
                ",
                [],
            )
            .map_err(|_e| NoteError::Backend(BackendError::TableCreationError))?;
        debug!("Initialized db with `notes` table");
        Ok(Self { connection })
    }
}

/// Maps a `rusqlite::Error` into a `NoteError`, wrapping known SQLite-specific codes into domain-specific variants.
///
/// Always returns a `NoteError::Backend` variant. Specific known `SQLite` error codes
/// are converted to more descriptive errors; all others are wrapped in `BackendError::Other`.
fn map_sqlite_error(e: SqliteError) -> NoteError {
    match e {
        SqliteError::SqliteFailure(code, _) => match code.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                NoteError::Backend(BackendError::Timeout)
            }
            ErrorCode::PermissionDenied | ErrorCode::ReadOnly => {
                NoteError::Backend(BackendError::PermissionDenied)
            }
            ErrorCode::NotADatabase => NoteError::Backend(BackendError::NotADatabase),
            ErrorCode::SchemaChanged => NoteError::Backend(BackendError::SchemaChanged),
            _ => NoteError::Backend(BackendError::Other(anyhow::anyhow!(
                "SQLite error: {:?}",
                code
            ))),
        },
        other => NoteError::Backend(BackendError::Other(anyhow::Error::new(other))),
    }
}

impl NoteBackend for SqliteBackend {
    /// Returns every row ordered by position.
    ///
    /// # Errors
    ///
    /// Returns a mapped `SQLite` error if the query fails
    fn load(&self) -> Result<Vec<Note>> {
        let mut stmt = self
            .connection
            .prepare("SELECT title, content, timestamp FROM notes ORDER BY position ASC")
            .map_err(map_sqlite_error)?;

        let notes_iter = stmt
            .query_map([], |row| {
                Ok(Note {
                    title: row.get(0)?,
                    content: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })
            .map_err(map_sqlite_error)?;

        notes_iter
            .collect::<std::result::Result<_, _>>()
            .map_err(map_sqlite_error)
    }

    /// Replaces all rows in one transaction, so a failed save leaves the previous collection.
    ///
    /// # Errors
    ///
    /// Returns a mapped `SQLite` error if any statement or the commit fails
    fn save(&self, notes: &[Note]) -> Result<()> {
        let tx = self
            .connection
            .unchecked_transaction()
            .map_err(map_sqlite_error)?;

        tx.execute("DELETE FROM notes", [])
            .map_err(map_sqlite_error)?;
        {
            let mut insert = tx
                .prepare(
                    "INSERT INTO notes (position, title, content, timestamp) VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(map_sqlite_error)?;
            for (position, note) in (0_i64..).zip(notes) {
                insert
                    .execute(params![position, note.title, note.content, note.timestamp])
                    .map_err(map_sqlite_error)?;
            }
        }

        tx.commit().map_err(map_sqlite_error)?;
        trace!("Replaced notes table with {} rows", notes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn note(title: &str, content: &str) -> Note {
        Note {
            title: title.to_string(),
            content: content.to_string(),
            timestamp: "2024-01-01 08:00:00".to_string(),
        }
    }

    #[test]
    fn fresh_database_is_empty() {
        let backend = SqliteBackend::new(":memory:").unwrap();
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn save_replaces_rows_in_order() {
        let backend = SqliteBackend::new(":memory:").unwrap();
        backend
            .save(&[note("z", "1"), note("a", "2"), note("z", "3")])
            .unwrap();
        backend.save(&[note("m", "4"), note("b", "5")]).unwrap();

        assert_eq!(
            backend.load().unwrap(),
            vec![note("m", "4"), note("b", "5")]
        );
    }

    #[test]
    fn rows_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.db");
        let path = path.to_str().unwrap();

        SqliteBackend::new(path)
            .unwrap()
            .save(&[note("kept", "body")])
            .unwrap();
        assert_eq!(
            SqliteBackend::new(path).unwrap().load().unwrap(),
            vec![note("kept", "body")]
        );
    }

    #[test]
    fn non_database_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.db");
        std::fs::write(&path, "definitely not sqlite, just some plain text padding it out").unwrap();

        assert!(SqliteBackend::new(path.to_str().unwrap()).is_err());
    }
}
