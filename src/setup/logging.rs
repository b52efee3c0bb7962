use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter, trace};
use std::io::Write;

/// Colored tag printed in front of every log line
fn level_tag(level: Level) -> colored::ColoredString {
    let tag = level.to_string();
    match level {
        Level::Error => tag.red().bold(),
        Level::Warn => tag.yellow().bold(),
        Level::Info => tag.green().bold(),
        Level::Debug => tag.blue().bold(),
        Level::Trace => tag.purple().bold(),
    }
}

/// Sets up the logger with colored level tags.
///
/// `level` comes from the command line; `RUST_LOG` still overrides it when set.
/// Safe to call more than once, later calls are ignored.
pub fn setup_log(level: LevelFilter) {
    let installed = Builder::new()
        .format(|buf, record| writeln!(buf, "{} {}", level_tag(record.level()), record.args()))
        .filter(None, level)
        .parse_default_env()
        .try_init();
    if let Err(e) = installed {
        trace!("Logger already installed: {e}");
    }
}
