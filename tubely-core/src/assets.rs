//! Media-type checks and storage key construction for uploaded assets.

use crate::aspect::AspectBucket;
use crate::error::{CoreError, CoreResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::Serialize;
use std::fmt;

/// Number of random bytes in an asset name (43 base64 characters).
pub const ASSET_NAME_BYTES: usize = 32;

/// The two kinds of upload the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Thumbnail,
}

impl AssetKind {
    /// Accepted media types and the extension each is stored with.
    #[must_use]
    pub fn allowed_types(self) -> &'static [(&'static str, &'static str)] {
        match self {
            AssetKind::Video => &[("video/mp4", "mp4")],
            AssetKind::Thumbnail => &[("image/jpeg", "jpg"), ("image/png", "png")],
        }
    }

    /// File extension for `media_type`, or `UnsupportedMediaType`.
    pub fn extension_for(self, media_type: &str) -> CoreResult<&'static str> {
        self.allowed_types()
            .iter()
            .find(|(ty, _)| *ty == media_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                CoreError::UnsupportedMediaType(format!("{media_type} is not a valid {self} type"))
            })
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Video => f.write_str("video"),
            AssetKind::Thumbnail => f.write_str("thumbnail"),
        }
    }
}

/// Reduces a `Content-Type` header value to its lowercase essence.
///
/// `"Video/MP4; codecs=avc1"` becomes `"video/mp4"`.
pub fn parse_media_type(content_type: &str) -> CoreResult<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some((ty, subtype)) if !ty.is_empty() && !subtype.is_empty() && !subtype.contains('/') => {
            Ok(essence)
        }
        _ => Err(CoreError::UnsupportedMediaType(format!(
            "invalid Content-Type '{content_type}'"
        ))),
    }
}

/// `<43 url-safe base64 chars>.<ext>` from 32 random bytes.
#[must_use]
pub fn random_asset_name(extension: &str) -> String {
    let mut key = [0u8; ASSET_NAME_BYTES];
    rand::thread_rng().fill_bytes(&mut key);
    format!("{}.{}", URL_SAFE_NO_PAD.encode(key), extension)
}

/// Storage key of a video: `<bucket directory>/<name>`.
#[must_use]
pub fn video_key(bucket: AspectBucket, name: &str) -> String {
    format!("{}/{}", bucket.directory_name(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_type() {
        assert_eq!(parse_media_type("video/mp4").unwrap(), "video/mp4");
        assert_eq!(parse_media_type(" Image/PNG ").unwrap(), "image/png");
        assert_eq!(parse_media_type("image/jpeg; charset=binary").unwrap(), "image/jpeg");
        assert!(parse_media_type("").is_err());
        assert!(parse_media_type("mp4").is_err());
        assert!(parse_media_type("video/").is_err());
        assert!(parse_media_type("/mp4").is_err());
        assert!(parse_media_type("a/b/c").is_err());
    }

    #[test]
    fn test_allowed_types() {
        assert_eq!(AssetKind::Video.extension_for("video/mp4").unwrap(), "mp4");
        assert!(matches!(
            AssetKind::Video.extension_for("video/webm"),
            Err(CoreError::UnsupportedMediaType(_))
        ));
        assert!(AssetKind::Video.extension_for("image/png").is_err());

        assert_eq!(AssetKind::Thumbnail.extension_for("image/jpeg").unwrap(), "jpg");
        assert_eq!(AssetKind::Thumbnail.extension_for("image/png").unwrap(), "png");
        assert!(AssetKind::Thumbnail.extension_for("image/gif").is_err());
        assert!(AssetKind::Thumbnail.extension_for("video/mp4").is_err());
    }

    #[test]
    fn test_random_asset_name_shape() {
        let name = random_asset_name("mp4");
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "mp4");
        assert_eq!(stem.len(), 43);
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(random_asset_name("mp4"), name);
    }

    #[test]
    fn test_video_key() {
        assert_eq!(video_key(AspectBucket::Portrait, "abc.mp4"), "portrait/abc.mp4");
        assert_eq!(video_key(AspectBucket::Other, "abc.mp4"), "other/abc.mp4");
    }
}
