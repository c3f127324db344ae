//! Where ingested assets end up.
//!
//! [`MediaStore`] is the seam for object storage. [`LocalStore`] writes into
//! the assets directory served by the backend itself; other backends (an S3
//! uploader, for instance) implement the same trait outside this crate.

use crate::config::AppConfig;
use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Destination for stored assets.
pub trait MediaStore {
    /// Stores the file at `source` under `key`. Returns the number of bytes written.
    fn put_object(&self, key: &str, source: &Path, content_type: &str) -> CoreResult<u64>;

    /// Public URL of the object stored under `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Stores assets below a local directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    base_url: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Store rooted at `config.assets_root`, served from `http://localhost:<port>/assets`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.assets_root.clone(), config.local_assets_url())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of `key`. Keys must be relative and must not climb out of the root.
    pub fn path_for(&self, key: &str) -> CoreResult<PathBuf> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(CoreError::Config(format!("invalid storage key '{key}'")));
        }
        Ok(self.root.join(relative))
    }
}

impl MediaStore for LocalStore {
    fn put_object(&self, key: &str, source: &Path, content_type: &str) -> CoreResult<u64> {
        let dest = self.path_for(key)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let written = fs::copy(source, &dest)?;
        log::info!(
            "Stored {} ({}, {} bytes) at {}",
            key,
            content_type,
            written,
            dest.display()
        );
        Ok(written)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_object_creates_bucket_directory() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let source = tmp.path().join("source.mp4");
        fs::write(&source, b"fake mp4 bytes")?;

        let store = LocalStore::new(tmp.path().join("assets"), "http://localhost:8091/assets");
        let written = store.put_object("landscape/abc.mp4", &source, "video/mp4")?;

        assert_eq!(written, 14);
        let stored = tmp.path().join("assets").join("landscape").join("abc.mp4");
        assert_eq!(fs::read(stored)?, b"fake mp4 bytes");
        Ok(())
    }

    #[test]
    fn test_public_url() {
        let store = LocalStore::new("assets", "http://localhost:8091/assets/");
        assert_eq!(
            store.public_url("portrait/x.mp4"),
            "http://localhost:8091/assets/portrait/x.mp4"
        );
    }

    #[test]
    fn test_rejects_escaping_keys() {
        let store = LocalStore::new("assets", "http://localhost:8091/assets");
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("/etc/passwd").is_err());
        assert!(store.path_for("a/./b").is_ok());
        assert!(store.path_for("").is_err());
        assert_eq!(
            store.path_for("other/y.png").unwrap(),
            PathBuf::from("assets").join("other").join("y.png")
        );
    }
}
