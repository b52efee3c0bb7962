use super::{MenuError, NoteError, NoteSummary, Result};

use crate::ui::io::IO;
use colored::Colorize;
use log::trace;
use std::io::{self, Write};
use tabled::{Table, settings::Style};

pub struct Cli;

impl Cli {
    fn prompt() -> Result<()> {
        print!("> ");
        io::stdout()
            .flush()
            .map_err(|e| NoteError::Menu(MenuError::StdoutWriteError(e)))
    }

    /// Reads one raw line. `None` at end of input
    fn read_line() -> Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .map_err(|e| NoteError::Menu(MenuError::StdinReadError(e)))?;
        Ok((read > 0).then_some(line))
    }
}

impl IO for Cli {
    /// Reads a single line of text and returns it without the line ending.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout or reading from stdin fails,
    /// and `MenuError::EndOfInput` once stdin is closed.
    fn get_input(&self) -> Result<String> {
        Self::prompt()?;
        let input = Self::read_line()?.ok_or(NoteError::Menu(MenuError::EndOfInput))?;
        println!();

        let input = input.trim_end_matches(['\r', '\n']).to_string();
        trace!("Got input: {input}");
        Ok(input)
    }

    /// Reads lines from stdin until a line exactly matching `stop_at` (trimmed) is entered,
    /// concatenates the preceding lines and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout or reading from stdin fails,
    /// and `MenuError::EndOfInput` if stdin closes before anything was entered.
    fn get_input_until(&self, stop_at: &str) -> Result<String> {
        let mut input = String::new();
        loop {
            Self::prompt()?;
            let Some(line) = Self::read_line()? else {
                if input.is_empty() {
                    return Err(NoteError::Menu(MenuError::EndOfInput));
                }
                break;
            };
            trace!("Got input: {}", line.trim_end());

            if line.trim() == stop_at {
                break;
            }
            input += &line;
        }
        println!();
        Ok(input)
    }

    fn show_menu(&self, options: &[impl std::fmt::Display]) {
        self.show_title("Choose an option");
        for o in options {
            println!("{o}");
        }
        println!();
    }

    /// Renders title and timestamp of every note in `psql` style
    fn show_notes_list(&self, summaries: Vec<NoteSummary>) {
        let mut table = Table::new(summaries);
        table.with(Style::psql());
        println!("{table}");
    }

    fn show_title(&self, title: &str) {
        println!("\n{}\n", title.to_string().bold());
    }

    fn show_text(&self, msg: &str) {
        println!("{msg}");
    }

    fn show_error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }
}
