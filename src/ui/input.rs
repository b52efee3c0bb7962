use super::{MenuError, NoteError, NoteValidationError, Result};
use crate::ui::io::IO;
use log::trace;

/// Line that ends multi-line content input
pub const CONTENT_TERMINATOR: &str = ".";

/// Rejects titles that are empty or whitespace only
///
/// # Errors
///
/// `NoteValidationError::TitleEmpty`
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        Err(NoteValidationError::TitleEmpty.into())
    } else {
        Ok(())
    }
}

/// Rejects content that is empty or whitespace only
///
/// # Errors
///
/// `NoteValidationError::ContentEmpty`
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        Err(NoteValidationError::ContentEmpty.into())
    } else {
        Ok(())
    }
}

/// Asks for a title until a non-blank one is given
///
/// # Errors
///
/// Forwards input errors
pub fn prompt_title(io: &impl IO) -> Result<String> {
    loop {
        io.show_text("Title:");
        let input = io.get_input()?;
        match validate_title(&input) {
            Ok(()) => {
                trace!("Got valid title: {input}");
                return Ok(input);
            }
            Err(e) => io.show_error(&e.to_string()),
        }
    }
}

/// Asks for multi-line content until a non-blank one is given
///
/// # Errors
///
/// Forwards input errors
pub fn prompt_content(io: &impl IO) -> Result<String> {
    loop {
        io.show_text("Content (end with '.' on last line):");
        let input = io.get_input_until(CONTENT_TERMINATOR)?;
        match validate_content(&input) {
            Ok(()) => {
                trace!("Got valid content: {input}");
                return Ok(input);
            }
            Err(e) => io.show_error(&e.to_string()),
        }
    }
}

/// Shows `titles` numbered from 1 and returns the picked one, or `None` on blank input
///
/// # Errors
///
/// Forwards input errors
pub fn prompt_choice(io: &impl IO, titles: &[String]) -> Result<Option<String>> {
    for (i, title) in titles.iter().enumerate() {
        io.show_text(&format!("({}) {title}", i + 1));
    }
    io.show_text("Pick a note (blank to go back):");

    loop {
        let input = io.get_input()?.trim().to_string();
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<usize>() {
            Ok(n) if (1..=titles.len()).contains(&n) => return Ok(Some(titles[n - 1].clone())),
            Ok(n) => io.show_error(&MenuError::InvalidOption(n).to_string()),
            Err(_) => io.show_error(&MenuError::ParseError(input).to_string()),
        }
    }
}

/// Yes/no question, repeated until answered
///
/// # Errors
///
/// Forwards input errors
pub fn confirm(io: &impl IO, question: &str) -> Result<bool> {
    loop {
        io.show_text(&format!("{question} (y/n):"));
        match io.get_input()?.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => io.show_error("Please enter 'y' or 'n'"),
        }
    }
}

/// Parses a menu number into any option enum built from `u8`
///
/// # Errors
///
/// `MenuError::ParseError` if input is not a number,
/// `MenuError::InvalidOption` if no option has that number
pub fn get_option<T: TryFrom<u8>>(io: &impl IO) -> Result<T> {
    let input = io.get_input()?.trim().to_string();
    match input.parse::<u8>() {
        Ok(n) => T::try_from(n).map_err(|_| NoteError::Menu(MenuError::InvalidOption(n.into()))),
        Err(_) => Err(NoteError::Menu(MenuError::ParseError(input))),
    }
}
