// tubely-cli/src/lib.rs
//
// Library portion of the Tubely CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, GlobalArgs};
pub use error::{CliErrorContext, CliResult};

/// Builds the configuration and dispatches to the selected command.
pub fn run(cli: Cli) -> CliResult<()> {
    let config = config::build_config(&cli.global)?;

    match cli.command {
        Commands::Classify(args) => commands::classify::run_classify(&config, &args),
        Commands::Faststart(args) => commands::faststart::run_faststart(&config, &args),
        Commands::UploadVideo(args) => commands::upload::run_upload_video(&config, &args),
        Commands::UploadThumbnail(args) => commands::upload::run_upload_thumbnail(&config, &args),
        Commands::Check => commands::check::run_check(&config),
    }
}
