// tubely-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use super::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use super::ffprobe_executor::{MediaProber, parse_probe_output};
use crate::aspect::Dimensions;
use crate::error::{CoreError, CoreResult, ProbeError, command_failed_error, command_start_error};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;
use std::sync::Mutex;

/// Canned behaviour for one path.
#[derive(Debug, Clone)]
pub enum MockProbe {
    /// Succeeds with these dimensions.
    Dimensions(u32, u32),
    /// Pretends ffprobe printed this to stdout and exited 0.
    Output(String),
    /// Pretends ffprobe exited with this code.
    ExitFailure(i32),
    /// Pretends ffprobe could not be started.
    SpawnFailure,
}

/// Mock implementation of [`MediaProber`].
///
/// Thread-safe, so it can stand in for the real prober in concurrent code.
#[derive(Debug, Default)]
pub struct MockMediaProber {
    expectations: Mutex<HashMap<PathBuf, MockProbe>>,
    calls: Mutex<Vec<PathBuf>>,
}

impl MockMediaProber {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expect(&self, path: &Path, probe: MockProbe) {
        self.expectations
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), probe);
    }

    pub fn expect_dimensions(&self, path: &Path, width: u32, height: u32) {
        self.expect(path, MockProbe::Dimensions(width, height));
    }

    pub fn expect_output(&self, path: &Path, stdout: &str) {
        self.expect(path, MockProbe::Output(stdout.to_string()));
    }

    pub fn expect_exit_failure(&self, path: &Path, exit_code: i32) {
        self.expect(path, MockProbe::ExitFailure(exit_code));
    }

    pub fn expect_spawn_failure(&self, path: &Path) {
        self.expect(path, MockProbe::SpawnFailure);
    }

    /// Number of probes issued for `path`.
    pub fn call_count(&self, path: &Path) -> usize {
        self.calls.lock().unwrap().iter().filter(|p| *p == path).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl MediaProber for MockMediaProber {
    fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProbeError> {
        log::info!("MockMediaProber::probe_dimensions called for: {}", path.display());
        self.calls.lock().unwrap().push(path.to_path_buf());

        let probe = self.expectations.lock().unwrap().get(path).cloned();
        match probe {
            Some(MockProbe::Dimensions(w, h)) => Dimensions::new(w, h).ok_or(
                ProbeError::InvalidDimensions {
                    width: i64::from(w),
                    height: i64::from(h),
                },
            ),
            Some(MockProbe::Output(stdout)) => parse_probe_output(stdout.as_bytes()),
            Some(MockProbe::ExitFailure(code)) => Err(command_failed_error(
                "ffprobe (mock)",
                ExitStatus::from_raw(code << 8),
                format!("{}: Invalid data found when processing input", path.display()),
            )
            .into()),
            Some(MockProbe::SpawnFailure) => Err(command_start_error(
                "ffprobe (mock)",
                io::Error::new(io::ErrorKind::NotFound, "mock spawn failure"),
            )
            .into()),
            None => {
                log::error!("MockMediaProber: No expectation set for path: {}", path.display());
                panic!("MockMediaProber: No expectation set for path {}", path.display());
            }
        }
    }
}

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    /// Bytes written to the last argument (the output path) when matched.
    pub dummy_output: Option<Vec<u8>>,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        dummy_output: Option<Vec<u8>>,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            dummy_output,
        });
    }

    /// Exits 0 and writes `output` to the output path.
    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        output: &[u8],
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), Some(output.to_vec()));
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), None);
    }

    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(exit_code << 8),
        };
        self.add_expectation(arg_pattern, Ok(process), None);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd.get_args().map(|s| s.to_string_lossy().into_owned()).collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
            panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        if let (Ok(_), Some(bytes)) = (&expectation.result, &expectation.dummy_output) {
            if let Some(output_path) = args.last() {
                if let Err(e) = std::fs::write(output_path, bytes) {
                    log::error!(
                        "MockFfmpegSpawner failed to create dummy output {}: {}",
                        output_path,
                        e
                    );
                }
            }
        }
        expectation.result
    }
}
