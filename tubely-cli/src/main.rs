// tubely-cli/src/main.rs
//
// Entry point of the `tubely` binary.
//
// Responsibilities:
// - Parsing command-line arguments (and their environment fallbacks).
// - Setting up logging to stderr and, optionally, a log file.
// - Running the selected command through `tubely_cli::run`.
// - Reporting errors and exiting with status 1 on failure.

use clap::Parser;
use std::process;

use tubely_cli::{Cli, logging, output};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.global.verbose, cli.global.log_file.as_deref()) {
        output::print_error(&e);
        process::exit(1);
    }
    log::debug!("Arguments: {:?}", cli);

    if let Err(e) = tubely_cli::run(cli) {
        log::debug!("Command failed: {:?}", e);
        output::print_error(&e);
        process::exit(1);
    }
}
