// tubely-cli/src/commands/faststart.rs
//
// Remuxes one mp4 for progressive playback.

use crate::cli::FaststartArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;
use tubely_core::utils::is_mp4_file;
use tubely_core::{AppConfig, CoreError, SidecarSpawner, format_bytes, remux_for_fast_start};

/// Runs `faststart`, writing `<FILE>.processing` next to the input.
pub fn run_faststart(config: &AppConfig, args: &FaststartArgs) -> CliResult<()> {
    if !is_mp4_file(&args.input) {
        return Err(CoreError::OperationFailed(format!(
            "Not an mp4 file: {}",
            args.input.display()
        )));
    }

    let output_path = remux_for_fast_start(&SidecarSpawner, &config.ffmpeg_path, &args.input)?;
    let size = std::fs::metadata(&output_path)
        .cli_with_context(|| format!("Failed to read {}", output_path.display()))?
        .len();

    output::print_success(format!("Remuxed {}", args.input.display()));
    output::print_info("Output", output_path.display());
    output::print_info("Size", format_bytes(size));
    Ok(())
}
