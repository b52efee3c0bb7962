use super::{MenuError, NoteError, NoteSummary, Result};
use crate::app::NoteStore;
use crate::setup::{arguments, logging};
use crate::ui::{cli, input};

use log::{debug, error, info};
use std::fmt;

/// Abstraction for input/output
pub trait IO {
    /// Read one line of input, without its line ending
    fn get_input(&self) -> Result<String>;
    /// Read multiple lines until a trimmed line equals `stop_at`
    fn get_input_until(&self, stop_at: &str) -> Result<String>;
    /// Display a list of selectable options
    fn show_menu(&self, options: &[impl std::fmt::Display]);
    /// Display a bolded title
    fn show_title(&self, title: &str);
    /// Render a table of note titles and timestamps
    fn show_notes_list(&self, summaries: Vec<NoteSummary>);
    /// Print a plain text message
    fn show_text(&self, msg: &str);
    /// Print a message the user has to act on
    fn show_error(&self, msg: &str);
}

/// Actions available in the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Add = 1,
    Edit = 2,
    Search = 3,
    List = 4,
    Quit = 5,
}

/// All menu options in display order
pub const ALL_MENU_OPTIONS: [MenuOption; 5] = [
    MenuOption::Add,
    MenuOption::Edit,
    MenuOption::Search,
    MenuOption::List,
    MenuOption::Quit,
];

impl TryFrom<u8> for MenuOption {
    type Error = ();

    fn try_from(n: u8) -> std::result::Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Add),
            2 => Ok(Self::Edit),
            3 => Ok(Self::Search),
            4 => Ok(Self::List),
            5 => Ok(Self::Quit),
            _ => Err(()),
        }
    }
}

/// Show the option number and label, e.g. `(1) Add note`
impl fmt::Display for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Add => "Add note",
            Self::Edit => "Edit note",
            Self::Search => "Search notes",
            Self::List => "List notes",
            Self::Quit => "Quit",
        };
        write!(f, "({}) {}", *self as u8, label)
    }
}

/// Actions on a single opened note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOption {
    Save = 1,
    Delete = 2,
    Back = 3,
}

pub const ALL_EDIT_OPTIONS: [EditOption; 3] =
    [EditOption::Save, EditOption::Delete, EditOption::Back];

impl TryFrom<u8> for EditOption {
    type Error = ();

    fn try_from(n: u8) -> std::result::Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Save),
            2 => Ok(Self::Delete),
            3 => Ok(Self::Back),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EditOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Save => "Save changes",
            Self::Delete => "Delete note",
            Self::Back => "Back",
        };
        write!(f, "({}) {}", *self as u8, label)
    }
}

/// Parse args, initialize logging, open the store and enter the main menu loop
///
/// # Errors
///
/// Returns an error if the notes could not be loaded at startup
pub fn run() -> Result<()> {
    let args = arguments::handle_args();
    logging::setup_log(args.log_level());
    debug!("{args:?}");

    let mut store = args.open_store()?;
    info!("Loaded {} notes", store.count());
    menu_loop(&cli::Cli, &mut store);
    Ok(())
}

/// Show the main menu and dispatch choices until the user quits or input ends
pub fn menu_loop(io: &impl IO, store: &mut NoteStore) {
    loop {
        io.show_text(&format!("Total notes: {}", store.count()));
        io.show_menu(&ALL_MENU_OPTIONS);

        let result = match input::get_option::<MenuOption>(io) {
            Ok(MenuOption::Quit) => break,
            Ok(option) => handle_menu_option(io, store, option),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {}
            Err(NoteError::Menu(MenuError::EndOfInput)) => {
                debug!("Input closed, leaving menu");
                break;
            }
            Err(NoteError::Menu(e @ MenuError::StdinReadError(_))) => {
                error!("{e}");
                break;
            }
            Err(e) => error!("{e}"),
        }
    }
}

/// Dispatch chosen `MenuOption` to its handler
fn handle_menu_option(io: &impl IO, store: &mut NoteStore, option: MenuOption) -> Result<()> {
    match option {
        MenuOption::Add => handle_add(io, store),
        MenuOption::Edit => handle_edit(io, store),
        MenuOption::Search => handle_search(io, store),
        MenuOption::List => {
            handle_list(io, store);
            Ok(())
        }
        MenuOption::Quit => Ok(()),
    }
}

/// Prompt for title and content, then add the note
fn handle_add(io: &impl IO, store: &mut NoteStore) -> Result<()> {
    io.show_title("Add note");
    let title = input::prompt_title(io)?;
    let content = input::prompt_content(io)?;

    store.add(title, content)?;
    io.show_text("Note added successfully!");
    Ok(())
}

/// Pick one of all notes and open it
fn handle_edit(io: &impl IO, store: &mut NoteStore) -> Result<()> {
    io.show_title("Select note to edit");
    let titles = store.titles();
    if titles.is_empty() {
        io.show_text("No notes available!");
        return Ok(());
    }
    pick_and_open(io, store, &titles)
}

/// Filter titles by a query, then pick one of the matches and open it
fn handle_search(io: &impl IO, store: &mut NoteStore) -> Result<()> {
    io.show_title("Search notes");
    io.show_text("Search (blank shows all):");
    let query = io.get_input()?;

    let matches = store.search(&query);
    debug!("Search '{query}' matched {} notes", matches.len());
    if matches.is_empty() {
        io.show_text("No notes found with this title.");
        return Ok(());
    }
    pick_and_open(io, store, &matches)
}

/// Table of all notes
fn handle_list(io: &impl IO, store: &NoteStore) {
    if store.count() == 0 {
        io.show_text("No notes available!");
    } else {
        io.show_notes_list(store.summaries());
    }
}

fn pick_and_open(io: &impl IO, store: &mut NoteStore, titles: &[String]) -> Result<()> {
    match input::prompt_choice(io, titles)? {
        Some(title) => open_note(io, store, &title),
        None => Ok(()),
    }
}

/// Show a note with its timestamp and offer to change or delete it
fn open_note(io: &impl IO, store: &mut NoteStore, title: &str) -> Result<()> {
    let (Some(content), Some(timestamp)) = (store.content(title), store.timestamp(title)) else {
        io.show_error(&format!("Note '{title}' not found!"));
        return Ok(());
    };
    let content = content.to_string();

    io.show_text(&"-".repeat(20));
    io.show_text(&format!("{title}\n"));
    io.show_text(content.trim_end());
    io.show_text(&format!("\nSaved on: {timestamp}"));
    io.show_text(&"-".repeat(20));

    let option = loop {
        io.show_menu(&ALL_EDIT_OPTIONS);
        match input::get_option::<EditOption>(io) {
            Ok(option) => break option,
            Err(NoteError::Menu(e @ (MenuError::ParseError(_) | MenuError::InvalidOption(_)))) => {
                io.show_error(&e.to_string());
            }
            Err(e) => return Err(e),
        }
    };

    match option {
        EditOption::Save => save_changes(io, store, title, &content),
        EditOption::Delete => delete_note(io, store, title),
        EditOption::Back => Ok(()),
    }
}

/// Ask for new values, blank keeps the current one. Nothing is written if nothing changed
fn save_changes(io: &impl IO, store: &mut NoteStore, title: &str, content: &str) -> Result<()> {
    io.show_text("New title (blank keeps current):");
    let new_title = io.get_input()?;
    let new_title = if new_title.trim().is_empty() {
        title.to_string()
    } else {
        new_title
    };

    io.show_text("New content (end with '.' on last line, blank keeps current):");
    let new_content = io.get_input_until(input::CONTENT_TERMINATOR)?;
    let new_content = if new_content.trim().is_empty() {
        content.to_string()
    } else {
        new_content
    };

    if new_title == title && new_content.trim() == content.trim() {
        io.show_text("Nothing changed");
        return Ok(());
    }

    if store.update(title, new_title, new_content)? {
        io.show_text("Note updated successfully!");
    } else {
        io.show_error(&format!("Note '{title}' not found!"));
    }
    Ok(())
}

fn delete_note(io: &impl IO, store: &mut NoteStore, title: &str) -> Result<()> {
    if !input::confirm(io, &format!("Delete '{title}'?"))? {
        info!("Not deleting note '{title}'");
        return Ok(());
    }

    if store.delete(title)? {
        io.show_text("Note deleted successfully!");
    } else {
        io.show_error(&format!("Note '{title}' not found!"));
    }
    Ok(())
}
