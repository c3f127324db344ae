// ============================================================================
// tubely-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffprobe and ffmpeg
//
// This module encapsulates interactions with the external command-line tools
// the ingest pipeline depends on. Each tool sits behind a trait so callers can
// inject a fake in tests:
//
// - MediaProber (ffprobe): reads a video's dimensions
// - FfmpegSpawner (ffmpeg): runs the fast-start remux

use crate::error::{CoreError, CoreResult, command_start_error};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Mock prober and spawner for tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{
    DEFAULT_FFMPEG, FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner,
    build_fast_start_command, fast_start_output_path, remux_for_fast_start,
};
pub use ffprobe_executor::{DEFAULT_FFPROBE, FfprobeProber, MediaProber, parse_probe_output};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command can be started.
///
/// Runs `<cmd> -version` and discards its output. Only the ability to start
/// the process matters, not its exit status.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - if the command does not exist
/// * `CoreError::Process` - if it exists but cannot be started
pub fn check_dependency(cmd: &Path) -> CoreResult<()> {
    let result = Command::new(cmd)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd.display());
            Err(CoreError::DependencyNotFound(cmd.display().to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd.display(), e);
            Err(command_start_error(cmd.display().to_string(), e).into())
        }
    }
}
