//! Temporary file management for uploads.
//!
//! Each ingest job gets its own temporary directory; the spooled upload and
//! the remuxed output both live inside it, so dropping the directory cleans
//! up every intermediate file even on error paths.

use crate::config::AppConfig;
use crate::error::{CoreError, CoreResult};
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, NamedTempFile, TempDir};

/// Prefix of per-job directories and spooled upload files.
pub const UPLOAD_PREFIX: &str = "tubely-upload-";

/// Creates a job directory under `config.temp_dir` (or the system temp dir).
/// Auto-cleaned when dropped.
pub fn create_job_dir(config: &AppConfig) -> CoreResult<TempDir> {
    let mut builder = TempFileBuilder::new();
    builder.prefix(UPLOAD_PREFIX);
    let dir = match &config.temp_dir {
        Some(base) => {
            std::fs::create_dir_all(base)?;
            builder.tempdir_in(base)?
        }
        None => builder.tempdir()?,
    };
    Ok(dir)
}

/// Copies at most `limit` bytes of `reader` into `tubely-upload-*.<ext>` inside `dir`.
///
/// Fails with `UploadTooLarge` if the reader holds more than `limit` bytes;
/// the partial file is removed.
pub fn spool_upload<R: Read>(
    reader: &mut R,
    dir: &Path,
    extension: &str,
    limit: u64,
) -> CoreResult<NamedTempFile> {
    let mut file = TempFileBuilder::new()
        .prefix(UPLOAD_PREFIX)
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;

    // One byte past the limit is enough to tell "exactly at limit" from "over".
    let copied = io::copy(&mut reader.take(limit.saturating_add(1)), &mut file)?;
    if copied > limit {
        log::warn!("Upload rejected: more than {} bytes", limit);
        return Err(CoreError::UploadTooLarge { limit });
    }
    file.flush()?;

    log::debug!("Spooled {} bytes to {}", copied, file.path().display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfigBuilder;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_job_dir_is_removed_on_drop() -> Result<(), Box<dyn std::error::Error>> {
        let base = tempdir()?;
        let config = AppConfigBuilder::new().temp_dir(base.path().join("jobs")).build();

        let job = create_job_dir(&config)?;
        let path = job.path().to_path_buf();
        assert!(path.starts_with(base.path().join("jobs")));
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(UPLOAD_PREFIX)));

        drop(job);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_spool_within_limit() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let mut body = Cursor::new(vec![7u8; 100]);

        let file = spool_upload(&mut body, dir.path(), "mp4", 100)?;
        assert_eq!(std::fs::read(file.path())?.len(), 100);
        assert!(file.path().extension().is_some_and(|e| e == "mp4"));
        Ok(())
    }

    #[test]
    fn test_spool_over_limit() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let mut body = Cursor::new(vec![7u8; 101]);

        let err = spool_upload(&mut body, dir.path(), "mp4", 100).unwrap_err();
        assert!(matches!(err, CoreError::UploadTooLarge { limit: 100 }));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }
}
