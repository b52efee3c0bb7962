pub mod cli;
pub mod input;
pub mod io;

pub use crate::{MenuError, NoteError, NoteSummary, NoteValidationError, Result};
