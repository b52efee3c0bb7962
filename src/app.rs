use crate::{Note, NoteBackend, NoteSummary, Result, TIMESTAMP_FORMAT};
use chrono::Local;
use log::{debug, trace, warn};

/// Owns the note collection and writes it back to the backend after every change.
///
/// Titles are the lookup key but are not required to be unique. Every lookup
/// resolves to the first note with a matching title, in collection order.
pub struct NoteStore {
    backend: Box<dyn NoteBackend>,
    notes: Vec<Note>,
    count: usize,
}

impl NoteStore {
    /// Opens a store on top of `backend`, loading whatever it already holds
    ///
    /// # Errors
    ///
    /// Returns an error if the backend has data that cannot be read
    pub fn open(backend: Box<dyn NoteBackend>) -> Result<Self> {
        let mut store = Self {
            backend,
            notes: Vec::new(),
            count: 0,
        };
        store.reload()?;
        Ok(store)
    }

    /// Replaces the in-memory collection with what the backend holds
    ///
    /// # Errors
    ///
    /// Returns an error if the backend has data that cannot be read
    pub fn reload(&mut self) -> Result<()> {
        self.notes = self.backend.load()?;
        self.count = self.notes.len();
        debug!("Loaded {} notes", self.count);
        Ok(())
    }

    /// Appends a note stamped with the current time and persists the collection.
    /// Does not check for blank fields or duplicate titles
    ///
    /// # Errors
    ///
    /// Returns an error if the collection could not be written. The note is not kept
    pub fn add(&mut self, title: String, content: String) -> Result<()> {
        let note = Note {
            title,
            content,
            timestamp: now_timestamp(),
        };
        trace!("Adding note: {note:?}");
        self.notes.push(note);
        self.count += 1;

        if let Err(e) = self.persist() {
            self.notes.pop();
            self.count -= 1;
            return Err(e);
        }
        Ok(())
    }

    /// All titles in collection order
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.notes.iter().map(|note| note.title.clone()).collect()
    }

    #[must_use]
    pub fn content(&self, title: &str) -> Option<&str> {
        self.find(title).map(|note| note.content.as_str())
    }

    #[must_use]
    pub fn timestamp(&self, title: &str) -> Option<&str> {
        self.find(title).map(|note| note.timestamp.as_str())
    }

    /// Overwrites title, content and timestamp of the first note titled `old_title`.
    /// Returns `false` if there is no such note
    ///
    /// # Errors
    ///
    /// Returns an error if the collection could not be written. The note keeps its old values
    pub fn update(
        &mut self,
        old_title: &str,
        new_title: String,
        new_content: String,
    ) -> Result<bool> {
        let Some(index) = self.position(old_title) else {
            debug!("No note titled '{old_title}' to update");
            return Ok(false);
        };

        let replacement = Note {
            title: new_title,
            content: new_content,
            timestamp: now_timestamp(),
        };
        let previous = std::mem::replace(&mut self.notes[index], replacement);

        if let Err(e) = self.persist() {
            self.notes[index] = previous;
            return Err(e);
        }
        debug!("Updated note '{old_title}'");
        Ok(true)
    }

    /// Removes the first note titled `title`. Returns `false` if there is no such note
    ///
    /// # Errors
    ///
    /// Returns an error if the collection could not be written. The note is put back
    pub fn delete(&mut self, title: &str) -> Result<bool> {
        let Some(index) = self.position(title) else {
            debug!("No note titled '{title}' to delete");
            return Ok(false);
        };

        let removed = self.notes.remove(index);
        self.count -= 1;

        if let Err(e) = self.persist() {
            self.notes.insert(index, removed);
            self.count += 1;
            return Err(e);
        }
        debug!("Deleted note '{title}'");
        Ok(true)
    }

    /// Titles containing `query`, ignoring case, in collection order.
    /// An empty query matches everything
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.notes
            .iter()
            .filter(|note| note.title.to_lowercase().contains(&needle))
            .map(|note| note.title.clone())
            .collect()
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Title and timestamp of every note, for listings
    #[must_use]
    pub fn summaries(&self) -> Vec<NoteSummary> {
        self.notes.iter().map(NoteSummary::from).collect()
    }

    // --- small helpers ---

    fn find(&self, title: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.title == title)
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.title == title)
    }

    fn persist(&self) -> Result<()> {
        self.backend.save(&self.notes).inspect_err(|e| {
            warn!("Failed saving notes, keeping previous state: {e}");
        })?;
        trace!("Persisted {} notes", self.count);
        Ok(())
    }
}

/// Current local time in `TIMESTAMP_FORMAT`
#[must_use]
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackendError, NoteError};
    use chrono::NaiveDateTime;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    // Backend double that keeps the last saved collection and can be told to fail
    #[derive(Default, Clone)]
    struct MemoryBackend {
        saved: Rc<RefCell<Vec<Note>>>,
        saves: Rc<Cell<usize>>,
        fail: Rc<Cell<bool>>,
    }

    impl NoteBackend for MemoryBackend {
        fn load(&self) -> Result<Vec<Note>> {
            Ok(self.saved.borrow().clone())
        }

        fn save(&self, notes: &[Note]) -> Result<()> {
            if self.fail.get() {
                return Err(BackendError::Other(anyhow::anyhow!("disk full")).into());
            }
            self.saves.set(self.saves.get() + 1);
            *self.saved.borrow_mut() = notes.to_vec();
            Ok(())
        }
    }

    fn store() -> (NoteStore, MemoryBackend) {
        let backend = MemoryBackend::default();
        let store = NoteStore::open(Box::new(backend.clone())).unwrap();
        (store, backend)
    }

    fn note(title: &str, content: &str, timestamp: &str) -> Note {
        Note {
            title: title.to_string(),
            content: content.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn empty_backend_opens_empty_store() {
        let (store, _) = store();
        assert_eq!(store.count(), 0);
        assert!(store.titles().is_empty());
    }

    #[test]
    fn add_keeps_insertion_order_and_count() {
        let (mut store, backend) = store();
        for title in ["b", "a", "c"] {
            store.add(title.to_string(), "body".to_string()).unwrap();
        }
        assert_eq!(store.count(), 3);
        assert_eq!(store.titles(), vec!["b", "a", "c"]);
        assert_eq!(backend.saves.get(), 3);
        assert_eq!(backend.saved.borrow().len(), 3);
    }

    #[test]
    fn add_stamps_current_time() {
        let (mut store, _) = store();
        let before = now_timestamp();
        store.add("t".to_string(), "c".to_string()).unwrap();

        let stamp = store.timestamp("t").unwrap();
        assert!(NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
        // Fixed-width format, so string order is time order
        assert!(stamp >= before.as_str());
        assert_eq!(store.content("t"), Some("c"));
    }

    #[test]
    fn lookups_miss_with_none() {
        let (store, _) = store();
        assert_eq!(store.content("nope"), None);
        assert_eq!(store.timestamp("nope"), None);
    }

    #[test]
    fn duplicate_titles_resolve_to_first() {
        let backend = MemoryBackend::default();
        backend.saved.borrow_mut().extend([
            note("dup", "first", "2024-01-01 00:00:00"),
            note("dup", "second", "2024-01-02 00:00:00"),
        ]);
        let mut store = NoteStore::open(Box::new(backend)).unwrap();

        assert_eq!(store.content("dup"), Some("first"));
        assert!(store.delete("dup").unwrap());
        assert_eq!(store.content("dup"), Some("second"));
    }

    #[test]
    fn update_replaces_fields_and_refreshes_timestamp() {
        let backend = MemoryBackend::default();
        backend
            .saved
            .borrow_mut()
            .push(note("old", "text", "2000-01-01 00:00:00"));
        let mut store = NoteStore::open(Box::new(backend.clone())).unwrap();

        assert!(store
            .update("old", "new".to_string(), "fresh".to_string())
            .unwrap());
        assert_eq!(store.titles(), vec!["new"]);
        assert_eq!(store.content("new"), Some("fresh"));
        assert!(store.timestamp("new").unwrap() > "2000-01-01 00:00:00");
        assert_eq!(backend.saved.borrow()[0].title, "new");
    }

    #[test]
    fn update_missing_title_changes_nothing() {
        let (mut store, backend) = store();
        store.add("a".to_string(), "1".to_string()).unwrap();
        let before = store.notes().to_vec();

        assert!(!store.update("zzz", "b".to_string(), "2".to_string()).unwrap());
        assert_eq!(store.notes(), before.as_slice());
        assert_eq!(backend.saves.get(), 1);
    }

    #[test]
    fn delete_removes_one_note() {
        let (mut store, _) = store();
        store.add("a".to_string(), "1".to_string()).unwrap();
        store.add("b".to_string(), "2".to_string()).unwrap();

        assert!(store.delete("a").unwrap());
        assert_eq!(store.count(), 1);
        assert_eq!(store.titles(), vec!["b"]);

        assert!(!store.delete("a").unwrap());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn search_ignores_case_and_keeps_order() {
        let (mut store, _) = store();
        for title in ["Groceries", "todo", "GROCERY run", "Misc"] {
            store.add(title.to_string(), "x".to_string()).unwrap();
        }
        assert_eq!(store.search("gRoCeR"), vec!["Groceries", "GROCERY run"]);
        assert_eq!(store.search(""), store.titles());
        assert!(store.search("absent").is_empty());
    }

    #[test]
    fn failed_add_is_rolled_back() {
        let (mut store, backend) = store();
        backend.fail.set(true);

        let err = store.add("a".to_string(), "1".to_string()).unwrap_err();
        assert!(matches!(err, NoteError::Backend(BackendError::Other(_))));
        assert_eq!(store.count(), 0);
        assert!(store.titles().is_empty());
    }

    #[test]
    fn failed_update_and_delete_are_rolled_back() {
        let (mut store, backend) = store();
        store.add("a".to_string(), "1".to_string()).unwrap();
        store.add("b".to_string(), "2".to_string()).unwrap();
        let before = store.notes().to_vec();
        backend.fail.set(true);

        assert!(store.update("a", "c".to_string(), "3".to_string()).is_err());
        assert!(store.delete("a").is_err());
        assert_eq!(store.notes(), before.as_slice());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn reload_picks_up_backend_contents() {
        let (mut store, backend) = store();
        backend
            .saved
            .borrow_mut()
            .push(note("outside", "edit", "2024-05-05 10:00:00"));
        store.reload().unwrap();
        assert_eq!(store.titles(), vec!["outside"]);
        assert_eq!(store.count(), 1);
    }
}
