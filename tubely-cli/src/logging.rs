// ============================================================================
// tubely-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern dispatch for the `log` facade
//
// Log lines go to stderr so stdout stays clean for command output (and for
// --json). With --log-file the same lines are appended to that file.
//
// Levels:
// - default: Info for tubely crates, Warn for everything else
// - --verbose: Debug for tubely crates

use log::LevelFilter;
use std::path::Path;

use crate::error::CliResult;
use tubely_core::CoreError;

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Level used for the tubely crates.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger. Must be called once, before any command runs.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<()> {
    let level = level_for(verbose);

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                get_timestamp(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for("tubely_core", level)
        .level_for("tubely_cli", level)
        .level_for("tubely", level)
        .chain(std::io::stderr());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch
        .apply()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(false), LevelFilter::Info);
        assert_eq!(level_for(true), LevelFilter::Debug);
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }
}
