// ============================================================================
// tubely-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the tubely-core library
//
// Three layers, from narrow to wide:
// - ProcessError: an external tool (ffprobe, ffmpeg) could not be started,
//   failed, or ran past its deadline
// - ProbeError: everything that can go wrong while reading a video's
//   dimensions
// - CoreError: the crate-wide error returned by pipeline operations

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Failure of an external process.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to start {command}: {source}")]
    Start {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting for {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{command} timed out after {} seconds", .timeout.as_secs_f64())]
    TimedOut { command: String, timeout: Duration },
}

/// Failure to read a video's dimensions.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe process failed: {0}")]
    Process(#[from] ProcessError),

    #[error("unexpected probe output: {0}")]
    Parse(String),

    #[error("probe output contains no streams")]
    EmptyStreams,

    #[error("first stream has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },
}

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Upload exceeds the limit of {limit} bytes")]
    UploadTooLarge { limit: u64 },

    #[error("Processed file is empty: {}", .0.display())]
    EmptyOutput(PathBuf),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    OperationFailed(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

pub(crate) fn command_start_error(command: impl Into<String>, source: io::Error) -> ProcessError {
    ProcessError::Start {
        command: command.into(),
        source,
    }
}

pub(crate) fn command_wait_error(command: impl Into<String>, source: io::Error) -> ProcessError {
    ProcessError::Wait {
        command: command.into(),
        source,
    }
}

pub(crate) fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> ProcessError {
    ProcessError::Failed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}
