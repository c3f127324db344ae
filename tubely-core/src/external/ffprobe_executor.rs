//! FFprobe integration for reading video dimensions.
//!
//! The [`MediaProber`] trait is the seam between classification and the
//! external tool. [`FfprobeProber`] spawns one ffprobe process per call,
//! captures its stdout and hands it to [`parse_probe_output`].

use crate::aspect::Dimensions;
use crate::error::{
    ProbeError, ProcessError, command_failed_error, command_start_error, command_wait_error,
};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default binary name, resolved through `PATH`.
pub const DEFAULT_FFPROBE: &str = "ffprobe";

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Something that can read the pixel size of a media file.
pub trait MediaProber: Send + Sync {
    /// Reads width and height of the first stream of `path`.
    fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<i64>,
    height: Option<i64>,
}

/// Parses `ffprobe -print_format json -show_streams` output.
///
/// Only the first entry of `streams` is considered, whatever its codec type.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Dimensions, ProbeError> {
    let output: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Parse(e.to_string()))?;

    let first = output.streams.first().ok_or(ProbeError::EmptyStreams)?;
    let (width, height) = match (first.width, first.height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(ProbeError::Parse(
                "first stream has no width/height".to_string(),
            ));
        }
    };

    u32::try_from(width)
        .ok()
        .zip(u32::try_from(height).ok())
        .and_then(|(w, h)| Dimensions::new(w, h))
        .ok_or(ProbeError::InvalidDimensions { width, height })
}

/// Process-backed [`MediaProber`].
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new(DEFAULT_FFPROBE)
    }
}

impl FfprobeProber {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kills the probe and fails with [`ProcessError::TimedOut`] once `timeout` elapses.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    // Not the `ffprobe` crate: it fixes `-v quiet -show_format` and cannot be killed on a timeout.
    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Runs ffprobe and returns its stdout. Non-zero exit is an error.
    fn run(&self, path: &Path) -> Result<Vec<u8>, ProcessError> {
        let name = self.binary.display().to_string();
        let mut child = self
            .command(path)
            .spawn()
            .map_err(|e| command_start_error(&name, e))?;

        // Both pipes are drained on their own threads so a chatty child
        // cannot block on a full pipe while we wait for it.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => wait_with_timeout(&mut child, &name, timeout)?,
            None => child.wait().map_err(|e| command_wait_error(&name, e))?,
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            log::error!("{} failed for {}: {} {}", name, path.display(), status, stderr);
            return Err(command_failed_error(name, status, stderr));
        }
        Ok(stdout)
    }
}

impl MediaProber for FfprobeProber {
    fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProbeError> {
        log::debug!("Running {} for dimensions on: {}", self.binary.display(), path.display());
        let stdout = self.run(path)?;
        parse_probe_output(&stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf) {
                log::warn!("Failed to read child output: {}", e);
            }
        }
        buf
    })
}

fn wait_with_timeout(
    child: &mut Child,
    name: &str,
    timeout: Duration,
) -> Result<std::process::ExitStatus, ProcessError> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if start.elapsed() >= timeout => {
                log::warn!("{} still running after {:?}, killing it", name, timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProcessError::TimedOut {
                    command: name.to_string(),
                    timeout,
                });
            }
            Ok(None) => thread::sleep(WAIT_POLL_INTERVAL),
            Err(e) => return Err(command_wait_error(name, e)),
        }
    }
}
