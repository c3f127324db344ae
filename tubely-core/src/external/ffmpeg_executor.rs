// ============================================================================
// tubely-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and the Fast-Start Remux
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes, and the one ffmpeg job the ingest pipeline needs: rewriting an
// mp4 so its index (moov atom) sits at the front of the file.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - remux_for_fast_start: stream-copy remux with `-movflags faststart`

use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Default binary name, resolved through `PATH`.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Suffix appended to the input path to name the remuxed output.
pub const FAST_START_SUFFIX: &str = "processing";

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            CoreError::Process(command_failed_error(
                "ffmpeg (event iterator)",
                ExitStatus::default(),
                e.to_string(),
            ))
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg", e).into())
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e).into())
    }
}

// --- Fast Start ---

/// Output path used for the remux of `input`: `<input>.processing`.
#[must_use]
pub fn fast_start_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(FAST_START_SUFFIX);
    PathBuf::from(name)
}

/// Builds `ffmpeg -i <input> -c copy -movflags faststart -f mp4 <output>`.
pub fn build_fast_start_command(ffmpeg: &Path, input: &Path, output: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new_with_path(ffmpeg);
    cmd.input(input.to_string_lossy().as_ref());
    cmd.args(["-c", "copy"]);
    cmd.args(["-movflags", "faststart"]);
    cmd.args(["-f", "mp4"]);
    cmd.output(output.to_string_lossy().as_ref());
    cmd
}

/// Remuxes `input` for progressive playback and returns the output path.
///
/// Streams are copied, not re-encoded. The output is written next to the
/// input and the caller owns its cleanup. On failure the partial output is
/// removed so a retry is not refused by ffmpeg's no-overwrite flag.
pub fn remux_for_fast_start<S: FfmpegSpawner>(
    spawner: &S,
    ffmpeg: &Path,
    input: &Path,
) -> CoreResult<PathBuf> {
    let output = fast_start_output_path(input);
    let cmd = build_fast_start_command(ffmpeg, input, &output);
    log::debug!("Running fast-start remux command: {:?}", cmd);

    let mut process = spawner.spawn(cmd)?;
    match finish_remux(&mut process, input, &output) {
        Ok(size) => {
            log::debug!(
                "Remuxed {} to {} ({} bytes)",
                input.display(),
                output.display(),
                size
            );
            Ok(output)
        }
        Err(e) => {
            discard_partial_output(&output);
            Err(e)
        }
    }
}

/// Drains events, checks the exit status and returns the output size.
fn finish_remux<P: FfmpegProcess>(process: &mut P, input: &Path, output: &Path) -> CoreResult<u64> {
    let mut errors: Vec<String> = Vec::new();
    process.handle_events(|event| {
        match event {
            FfmpegEvent::Error(msg) | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => {
                log::debug!("ffmpeg: {}", msg);
                errors.push(msg);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        log::error!("Fast-start remux of {} failed: {}", input.display(), status);
        let stderr = errors.join("\n");
        return Err(command_failed_error("ffmpeg (fast start)", status, stderr).into());
    }

    let size = fs::metadata(output)
        .map_err(|e| {
            log::error!("Could not stat processed file {}: {}", output.display(), e);
            CoreError::Io(e)
        })?
        .len();
    if size == 0 {
        return Err(CoreError::EmptyOutput(output.to_path_buf()));
    }
    Ok(size)
}

fn discard_partial_output(output: &Path) {
    match fs::remove_file(output) {
        Ok(()) => log::debug!("Removed partial output {}", output.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove partial output {}: {}", output.display(), e),
    }
}
