use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match jotter::ui::io::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
