//! Exam tickets - generate exam tickets from a pool of tasks

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = exam_tickets::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
