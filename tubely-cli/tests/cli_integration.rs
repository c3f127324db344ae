use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tempfile::tempdir;

// Tests that write an executable script run one at a time; a concurrent
// fork can hold the script open for writing and make exec fail with ETXTBSY.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

// Helper function to get the path to the compiled binary, isolated from
// configuration in the caller's environment.
fn tubely_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tubely").expect("Failed to find tubely binary");
    for var in [
        "PORT",
        "ASSETS_ROOT",
        "TUBELY_TEMP_DIR",
        "S3_BUCKET",
        "S3_REGION",
        "S3_CF_DISTRO",
        "TUBELY_FFPROBE",
        "TUBELY_FFMPEG",
        "TUBELY_PROBE_TIMEOUT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[cfg(unix)]
fn fake_ffprobe(dir: &Path, body: &str) -> Result<std::path::PathBuf, Box<dyn Error>> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffprobe");
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

#[cfg(unix)]
#[test]
fn test_classify_prints_bucket() -> Result<(), Box<dyn Error>> {
    let _guard = serial();
    let dir = tempdir()?;
    let ffprobe = fake_ffprobe(
        dir.path(),
        r#"echo '{"streams": [{"width": 1920, "height": 1080}]}'"#,
    )?;

    tubely_cmd()
        .arg("classify")
        .arg("wide.mp4")
        .arg("--ffprobe")
        .arg(&ffprobe)
        .assert()
        .success()
        .stdout(contains("wide.mp4: landscape (1920x1080)"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_classify_json_output() -> Result<(), Box<dyn Error>> {
    let _guard = serial();
    let dir = tempdir()?;
    let ffprobe = fake_ffprobe(
        dir.path(),
        r#"echo '{"streams": [{"width": 1080, "height": 1920}]}'"#,
    )?;

    tubely_cmd()
        .env("TUBELY_FFPROBE", &ffprobe)
        .args(["classify", "--json", "tall.mp4"])
        .assert()
        .success()
        .stdout(contains(r#""bucket": "portrait""#))
        .stdout(contains(r#""width": 1080"#));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_classify_reports_probe_failure() -> Result<(), Box<dyn Error>> {
    let _guard = serial();
    let dir = tempdir()?;
    let ffprobe = fake_ffprobe(dir.path(), "echo 'moov atom not found' >&2\nexit 1")?;

    tubely_cmd()
        .arg("classify")
        .arg("broken.mp4")
        .arg("--ffprobe")
        .arg(&ffprobe)
        .assert()
        .failure()
        .stderr(contains("moov atom not found"))
        .stderr(contains("1 of 1 file(s) could not be classified"));

    Ok(())
}

#[test]
fn test_upload_thumbnail_stores_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let assets = dir.path().join("assets");
    let thumbnail = dir.path().join("thumb.png");
    fs::write(&thumbnail, b"\x89PNG fake image")?;

    tubely_cmd()
        .arg("upload-thumbnail")
        .arg(&thumbnail)
        .arg("--json")
        .arg("--assets-root")
        .arg(&assets)
        .arg("--port")
        .arg("9123")
        .assert()
        .success()
        .stdout(contains(r#""kind": "thumbnail""#))
        .stdout(contains("http://localhost:9123/assets/"));

    let stored: Vec<_> = fs::read_dir(&assets)?.collect::<Result<_, _>>()?;
    assert_eq!(stored.len(), 1);
    let stored_path = stored[0].path();
    assert_eq!(stored_path.extension().and_then(|e| e.to_str()), Some("png"));
    assert_eq!(fs::read(stored_path)?, b"\x89PNG fake image");

    Ok(())
}

#[test]
fn test_upload_video_rejects_wrong_type() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let video = dir.path().join("clip.mov");
    fs::write(&video, b"not an mp4")?;

    tubely_cmd()
        .arg("upload-video")
        .arg(&video)
        .arg("--content-type")
        .arg("video/quicktime")
        .arg("--assets-root")
        .arg(dir.path().join("assets"))
        .assert()
        .failure()
        .stderr(contains("Unsupported media type"));

    assert!(!dir.path().join("assets").exists());
    Ok(())
}

#[test]
fn test_upload_non_existent_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;

    tubely_cmd()
        .arg("upload-thumbnail")
        .arg(dir.path().join("missing.png"))
        .arg("--assets-root")
        .arg(dir.path().join("assets"))
        .assert()
        .failure()
        .stderr(contains("Failed to open"));

    Ok(())
}

#[test]
fn test_check_reports_missing_tool() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;

    tubely_cmd()
        .arg("check")
        .arg("--ffprobe")
        .arg(dir.path().join("no-such-ffprobe"))
        .assert()
        .failure()
        .stderr(contains("ffprobe"));

    Ok(())
}

#[test]
fn test_zero_probe_timeout_is_rejected() {
    tubely_cmd()
        .env("TUBELY_PROBE_TIMEOUT", "0")
        .args(["classify", "clip.mp4"])
        .assert()
        .failure()
        .stderr(contains("Invalid configuration"));
}

#[test]
fn test_invalid_subcommand() {
    tubely_cmd().arg("transcode").assert().failure();
}
