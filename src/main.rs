//! staffbook - employee records from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = staffbook::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
