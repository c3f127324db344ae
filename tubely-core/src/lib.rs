//! Core library for the Tubely video ingest pipeline.
//!
//! This crate classifies uploaded videos by aspect ratio using ffprobe,
//! remuxes them for fast start using ffmpeg, and names and stores uploaded
//! videos and thumbnails.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use tubely_core::{AppConfig, FfprobeProber, LocalStore, SidecarSpawner};
//! use tubely_core::ingest::Ingestor;
//! use std::fs::File;
//!
//! let config = AppConfig::default();
//! config.validate().unwrap();
//!
//! let prober = FfprobeProber::new(&config.ffprobe_path).with_timeout(config.probe_timeout);
//! let store = LocalStore::from_config(&config);
//! let ingestor = Ingestor::new(&config, &prober, &SidecarSpawner, &store);
//!
//! let mut body = File::open("upload.mp4").unwrap();
//! let asset = ingestor.ingest_video(&mut body, "video/mp4").unwrap();
//! println!("{} -> {}", asset.key, asset.url);
//! ```

pub mod aspect;
pub mod assets;
pub mod config;
pub mod error;
pub mod external;
pub mod ingest;
pub mod storage;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use aspect::{
    AspectBucket, Dimensions, classify, classify_file, classify_files, gcd,
    resolve_bucket_directory,
};
pub use assets::AssetKind;
pub use config::{AppConfig, AppConfigBuilder};
pub use error::{CoreError, CoreResult, ProbeError, ProcessError};
pub use external::{
    FfmpegSpawner, FfprobeProber, MediaProber, SidecarSpawner, check_dependency,
    remux_for_fast_start,
};
pub use ingest::{Ingestor, StoredAsset, ingest_thumbnail};
pub use storage::{LocalStore, MediaStore};
pub use utils::format_bytes;
