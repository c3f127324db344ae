// tubely-cli/src/commands/check.rs
//
// Verifies that ffprobe and ffmpeg are installed and runnable.

use crate::error::CliResult;
use crate::output;
use tubely_core::{AppConfig, CoreError, check_dependency};

/// Runs `check`. Reports every tool before failing.
pub fn run_check(config: &AppConfig) -> CliResult<()> {
    let tools = [("ffprobe", &config.ffprobe_path), ("ffmpeg", &config.ffmpeg_path)];
    let mut missing = Vec::new();

    for (name, path) in tools {
        match check_dependency(path) {
            Ok(()) => output::print_success(format!("{} ({})", name, path.display())),
            Err(e) => {
                output::print_failure(format!("{name}: {e}"));
                missing.push(name);
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::DependencyNotFound(missing.join(", ")))
    }
}
