// tubely-core/tests/ffmpeg_wrapper_tests.rs

use std::path::Path;
use tempfile::tempdir;
use tubely_core::external::mocks::MockFfmpegSpawner;
use tubely_core::{CoreError, ProcessError, remux_for_fast_start};

#[test]
fn test_remux_for_fast_start_args() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let input_path = tmp.path().join("upload.mp4");
    std::fs::write(&input_path, b"raw")?;

    let mock_spawner = MockFfmpegSpawner::new();
    mock_spawner.add_success_expectation("faststart", vec![], b"remuxed");

    let output = remux_for_fast_start(&mock_spawner, Path::new("/usr/bin/ffmpeg"), &input_path)?;
    assert_eq!(output, tmp.path().join("upload.mp4.processing"));
    assert_eq!(std::fs::read(&output)?, b"remuxed");

    let calls = mock_spawner.get_received_calls();
    assert_eq!(calls.len(), 1, "Expected one call to ffmpeg spawner");
    let args = &calls[0];

    let value_after = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    };
    let input_arg = input_path.to_string_lossy();
    assert_eq!(value_after("-i"), Some(input_arg.as_ref()), "Should contain -i <input>");
    assert_eq!(value_after("-c"), Some("copy"), "Should stream copy");
    assert_eq!(value_after("-movflags"), Some("faststart"), "Should set faststart");
    assert_eq!(value_after("-f"), Some("mp4"), "Should force mp4");
    // No re-encode
    assert!(!args.iter().any(|a| a == "-crf" || a == "-c:v"));

    Ok(())
}

#[test]
fn test_remux_spawn_failure() {
    let tmp = tempdir().unwrap();
    let input_path = tmp.path().join("upload.mp4");

    let mock_spawner = MockFfmpegSpawner::new();
    mock_spawner.add_spawn_error_expectation(
        "faststart",
        CoreError::DependencyNotFound("ffmpeg".to_string()),
    );

    let err = remux_for_fast_start(&mock_spawner, Path::new("ffmpeg"), &input_path).unwrap_err();
    assert!(matches!(err, CoreError::DependencyNotFound(_)));
}

#[test]
fn test_remux_non_zero_exit() {
    let tmp = tempdir().unwrap();
    let input_path = tmp.path().join("upload.mp4");

    let mock_spawner = MockFfmpegSpawner::new();
    mock_spawner.add_exit_error_expectation("faststart", vec![], 1);

    let err = remux_for_fast_start(&mock_spawner, Path::new("ffmpeg"), &input_path).unwrap_err();
    assert!(matches!(err, CoreError::Process(ProcessError::Failed { .. })));
    assert!(!tmp.path().join("upload.mp4.processing").exists());
}

#[cfg(unix)]
mod sidecar {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard};
    use tempfile::tempdir;
    use tubely_core::{CoreError, ProcessError, SidecarSpawner, remux_for_fast_start};

    // Writing an executable while another test thread forks can make exec
    // fail with ETXTBSY, so these tests run one at a time.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("ffmpeg");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_empty_output_is_removed() {
        let _guard = serial();
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("clip.mp4");
        fs::write(&input, b"raw").unwrap();
        let output = tmp.path().join("clip.mp4.processing");
        let ffmpeg = fake_ffmpeg(tmp.path(), &format!(": > '{}'", output.display()));

        let err = remux_for_fast_start(&SidecarSpawner, &ffmpeg, &input).unwrap_err();
        assert!(matches!(err, CoreError::EmptyOutput(ref p) if p == &output));
        assert!(!output.exists(), "partial output should be removed");

        // A second attempt hits the same error instead of "already exists".
        let err = remux_for_fast_start(&SidecarSpawner, &ffmpeg, &input).unwrap_err();
        assert!(matches!(err, CoreError::EmptyOutput(_)));
    }

    #[test]
    fn test_failed_remux_output_is_removed() {
        let _guard = serial();
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("clip.mp4");
        fs::write(&input, b"raw").unwrap();
        let output = tmp.path().join("clip.mp4.processing");
        let ffmpeg = fake_ffmpeg(
            tmp.path(),
            &format!("printf 'half' > '{}'\nexit 1", output.display()),
        );

        let err = remux_for_fast_start(&SidecarSpawner, &ffmpeg, &input).unwrap_err();
        assert!(matches!(err, CoreError::Process(ProcessError::Failed { .. })));
        assert!(!output.exists(), "partial output should be removed");
        assert_eq!(fs::read(&input).unwrap(), b"raw");
    }

    #[test]
    fn test_successful_remux_keeps_output() {
        let _guard = serial();
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("clip.mp4");
        fs::write(&input, b"raw").unwrap();
        let output = tmp.path().join("clip.mp4.processing");
        let ffmpeg = fake_ffmpeg(tmp.path(), &format!("printf 'moov' > '{}'", output.display()));

        let result = remux_for_fast_start(&SidecarSpawner, &ffmpeg, &input).unwrap();
        assert_eq!(result, output);
        assert_eq!(fs::read(&output).unwrap(), b"moov");
    }
}
