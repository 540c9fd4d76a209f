// Fri Oct 16 2026 - Alex

use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    match vtable_layout::ui::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
