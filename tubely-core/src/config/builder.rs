// ============================================================================
// tubely-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for AppConfig
//
// Fluent construction of AppConfig with defaults for every field, so callers
// only name what they override.

use std::path::PathBuf;
use std::time::Duration;

use super::AppConfig;
use crate::external::{DEFAULT_FFMPEG, DEFAULT_FFPROBE};

/// Builder for creating AppConfig instances.
///
/// # Examples
///
/// ```rust
/// use tubely_core::config::AppConfigBuilder;
///
/// let config = AppConfigBuilder::new()
///     .s3_bucket("tubely-12345")
///     .s3_region("us-east-2")
///     .s3_cf_distribution("https://d111111abcdef8.cloudfront.net")
///     .build();
/// assert_eq!(config.s3_bucket.as_deref(), Some("tubely-12345"));
/// ```
#[derive(Debug, Clone)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: AppConfig {
                port: super::DEFAULT_PORT,
                assets_root: PathBuf::from(super::DEFAULT_ASSETS_ROOT),
                temp_dir: None,
                s3_bucket: None,
                s3_region: None,
                s3_cf_distribution: None,
                ffprobe_path: PathBuf::from(DEFAULT_FFPROBE),
                ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG),
                probe_timeout: None,
                max_video_bytes: super::DEFAULT_MAX_VIDEO_BYTES,
                max_thumbnail_bytes: super::DEFAULT_MAX_THUMBNAIL_BYTES,
            },
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn assets_root<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.assets_root = dir.into();
        self
    }

    pub fn temp_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    pub fn s3_bucket<S: Into<String>>(mut self, bucket: S) -> Self {
        self.config.s3_bucket = Some(bucket.into());
        self
    }

    pub fn s3_region<S: Into<String>>(mut self, region: S) -> Self {
        self.config.s3_region = Some(region.into());
        self
    }

    pub fn s3_cf_distribution<S: Into<String>>(mut self, url: S) -> Self {
        self.config.s3_cf_distribution = Some(url.into());
        self
    }

    pub fn ffprobe_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.ffprobe_path = path.into();
        self
    }

    pub fn ffmpeg_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = Some(timeout);
        self
    }

    pub fn max_video_bytes(mut self, bytes: u64) -> Self {
        self.config.max_video_bytes = bytes;
        self
    }

    pub fn max_thumbnail_bytes(mut self, bytes: u64) -> Self {
        self.config.max_thumbnail_bytes = bytes;
        self
    }

    /// Builds the AppConfig. Call [`AppConfig::validate`] before use.
    pub fn build(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = AppConfigBuilder::new()
            .port(9000)
            .assets_root("/srv/assets")
            .temp_dir("/var/tmp/tubely")
            .ffprobe_path("/opt/bin/ffprobe")
            .ffmpeg_path("/opt/bin/ffmpeg")
            .probe_timeout(Duration::from_secs(5))
            .max_video_bytes(1000)
            .max_thumbnail_bytes(10)
            .build();

        assert_eq!(config.port, 9000);
        assert_eq!(config.assets_root, PathBuf::from("/srv/assets"));
        assert_eq!(config.temp_dir, Some(PathBuf::from("/var/tmp/tubely")));
        assert_eq!(config.ffprobe_path, PathBuf::from("/opt/bin/ffprobe"));
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/bin/ffmpeg"));
        assert_eq!(config.probe_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.max_video_bytes, 1000);
        assert_eq!(config.max_thumbnail_bytes, 10);
    }
}
