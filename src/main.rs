//! Tilechip - Command-line tool for cutting PNG images into palette-indexed tiles

use std::process::ExitCode;

use tilechip::cli;

fn main() -> ExitCode {
    cli::run()
}
