//! Configuration structures and constants for the tubely-core library.
//!
//! [`AppConfig`] replaces process-wide settings: it is built once (usually
//! from CLI arguments and environment variables) and passed by reference to
//! every operation that needs it.

mod builder;

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;
use std::time::Duration;

pub use builder::AppConfigBuilder;

// Default constants

/// Default port of the asset server, used in local asset URLs.
pub const DEFAULT_PORT: u16 = 8091;

/// Default directory that local assets are written to.
pub const DEFAULT_ASSETS_ROOT: &str = "assets";

/// Largest accepted video upload (1 GiB).
pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 1 << 30;

/// Largest accepted thumbnail upload (10 MiB).
pub const DEFAULT_MAX_THUMBNAIL_BYTES: u64 = 10 << 20;

/// Main configuration structure for the tubely-core library.
///
/// # Examples
///
/// ```rust
/// use tubely_core::config::AppConfigBuilder;
/// use std::time::Duration;
///
/// let config = AppConfigBuilder::new()
///     .port(8080)
///     .assets_root("/srv/tubely/assets")
///     .probe_timeout(Duration::from_secs(30))
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ---- Serving ----
    /// Port the asset server listens on
    pub port: u16,

    /// Directory where locally stored assets are written
    pub assets_root: PathBuf,

    /// Parent directory for per-upload temp directories (system temp if unset)
    pub temp_dir: Option<PathBuf>,

    // ---- Object storage ----
    /// Bucket used by the object-storage uploader
    pub s3_bucket: Option<String>,

    /// Region of `s3_bucket`
    pub s3_region: Option<String>,

    /// Public base URL (e.g. a CloudFront distribution) that serves stored videos
    pub s3_cf_distribution: Option<String>,

    // ---- External tools ----
    pub ffprobe_path: PathBuf,
    pub ffmpeg_path: PathBuf,

    /// Kill a probe that runs longer than this; `None` waits forever
    pub probe_timeout: Option<Duration>,

    // ---- Limits ----
    pub max_video_bytes: u64,
    pub max_thumbnail_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfigBuilder::new().build()
    }
}

impl AppConfig {
    /// Checks values the builder cannot reject on its own.
    pub fn validate(&self) -> CoreResult<()> {
        if self.port == 0 {
            return Err(CoreError::Config("port must be non-zero".to_string()));
        }
        if self.assets_root.as_os_str().is_empty() {
            return Err(CoreError::Config("assets root must not be empty".to_string()));
        }
        if self.max_video_bytes == 0 || self.max_thumbnail_bytes == 0 {
            return Err(CoreError::Config("upload limits must be non-zero".to_string()));
        }
        if self.probe_timeout == Some(Duration::ZERO) {
            return Err(CoreError::Config("probe timeout must be non-zero".to_string()));
        }
        if let Some(distribution) = &self.s3_cf_distribution {
            if !(distribution.starts_with("https://") || distribution.starts_with("http://")) {
                return Err(CoreError::Config(format!(
                    "distribution URL must start with http:// or https://, got '{distribution}'"
                )));
            }
        }
        Ok(())
    }

    /// Base URL of locally served assets.
    #[must_use]
    pub fn local_assets_url(&self) -> String {
        format!("http://localhost:{}/assets", self.port)
    }

    /// Public URL of an object stored under `key` behind the distribution.
    #[must_use]
    pub fn distribution_url(&self, key: &str) -> Option<String> {
        self.s3_cf_distribution
            .as_deref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), key))
    }
}
