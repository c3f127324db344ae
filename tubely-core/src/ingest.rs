// ============================================================================
// tubely-core/src/ingest.rs
// ============================================================================
//
// INGEST PIPELINE: From an upload body to a stored asset
//
// Videos:     validate type -> spool -> classify -> remux -> store
// Thumbnails: validate type -> spool -> store
//
// Every intermediate file lives in a per-job temp directory that is removed
// when the job returns, successfully or not. The caller (an HTTP handler)
// is responsible for authentication, ownership checks and recording the
// returned URL on the video's metadata.

use crate::aspect::{AspectBucket, Dimensions, classify_file};
use crate::assets::{AssetKind, parse_media_type, random_asset_name, video_key};
use crate::config::AppConfig;
use crate::error::CoreResult;
use crate::external::{FfmpegSpawner, MediaProber, remux_for_fast_start};
use crate::storage::MediaStore;
use crate::temp_files::{create_job_dir, spool_upload};
use serde::Serialize;
use std::io::Read;

/// What an ingest stored and where it can be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAsset {
    pub kind: AssetKind,
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<AspectBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Tools and destination used by the ingest operations.
pub struct Ingestor<'a, P: ?Sized, S, M: ?Sized> {
    config: &'a AppConfig,
    prober: &'a P,
    spawner: &'a S,
    store: &'a M,
}

impl<'a, P, S, M> Ingestor<'a, P, S, M>
where
    P: MediaProber + ?Sized,
    S: FfmpegSpawner,
    M: MediaStore + ?Sized,
{
    pub fn new(config: &'a AppConfig, prober: &'a P, spawner: &'a S, store: &'a M) -> Self {
        Self {
            config,
            prober,
            spawner,
            store,
        }
    }

    /// Stores an uploaded video under `<bucket>/<random>.mp4`.
    ///
    /// The stored object is the fast-start remux, not the raw upload. If the
    /// distribution URL is configured the returned URL points there,
    /// otherwise at the store's own public URL.
    pub fn ingest_video<R: Read>(
        &self,
        body: &mut R,
        content_type: &str,
    ) -> CoreResult<StoredAsset> {
        let media_type = parse_media_type(content_type)?;
        let extension = AssetKind::Video.extension_for(&media_type)?;

        let job = create_job_dir(self.config)?;
        let upload = spool_upload(body, job.path(), extension, self.config.max_video_bytes)?;

        let (bucket, dimensions) = classify_file(self.prober, upload.path())?;
        let key = video_key(bucket, &random_asset_name(extension));

        let processed =
            remux_for_fast_start(self.spawner, &self.config.ffmpeg_path, upload.path())?;
        let size = self.store.put_object(&key, &processed, &media_type)?;

        let url = self
            .config
            .distribution_url(&key)
            .unwrap_or_else(|| self.store.public_url(&key));
        log::info!("Ingested video {} ({}, {})", key, dimensions, bucket);

        Ok(StoredAsset {
            kind: AssetKind::Video,
            key,
            url,
            content_type: media_type,
            size,
            bucket: Some(bucket),
            dimensions: Some(dimensions),
        })
    }

    /// Stores an uploaded thumbnail under `<random>.<jpg|png>`.
    pub fn ingest_thumbnail<R: Read>(
        &self,
        body: &mut R,
        content_type: &str,
    ) -> CoreResult<StoredAsset> {
        ingest_thumbnail(self.config, self.store, body, content_type)
    }
}

/// Thumbnail ingest; needs neither ffprobe nor ffmpeg.
pub fn ingest_thumbnail<M, R>(
    config: &AppConfig,
    store: &M,
    body: &mut R,
    content_type: &str,
) -> CoreResult<StoredAsset>
where
    M: MediaStore + ?Sized,
    R: Read,
{
    let media_type = parse_media_type(content_type)?;
    let extension = AssetKind::Thumbnail.extension_for(&media_type)?;

    let job = create_job_dir(config)?;
    let upload = spool_upload(body, job.path(), extension, config.max_thumbnail_bytes)?;

    let key = random_asset_name(extension);
    let size = store.put_object(&key, upload.path(), &media_type)?;
    log::info!("Ingested thumbnail {}", key);

    Ok(StoredAsset {
        kind: AssetKind::Thumbnail,
        url: store.public_url(&key),
        key,
        content_type: media_type,
        size,
        bucket: None,
        dimensions: None,
    })
}
