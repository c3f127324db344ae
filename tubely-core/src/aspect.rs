//! Aspect-ratio classification of uploaded videos.
//!
//! A video's first stream is probed for its pixel size, the ratio is reduced
//! by the greatest common divisor, and the reduced pair is sorted into one of
//! three buckets. The bucket's directory name namespaces the stored object.
//!
//! The bucket rule uses integer floor division:
//!
//! * `w' == floor(16 * h' / 9)` is [`AspectBucket::Landscape`]
//! * otherwise `h' == floor(16 * w' / 9)` is [`AspectBucket::Portrait`]
//! * anything else is [`AspectBucket::Other`]
//!
//! This is an approximation of 16:9 / 9:16 and it is intentionally kept
//! as-is, since existing storage layouts depend on its exact boundaries. For
//! example 16:10 reduces to 8:5 and `floor(80 / 9) == 8`, so it lands in
//! `landscape`; a square video reduces to 1:1 and also lands in `landscape`.

use crate::error::ProbeError;
use crate::external::MediaProber;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pixel size of a video stream. Both sides are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Returns `None` when either side is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Ratio reduced by the greatest common divisor.
    #[must_use]
    pub fn reduced(&self) -> (u32, u32) {
        let divisor = gcd(self.width, self.height);
        (self.width / divisor, self.height / divisor)
    }

    #[must_use]
    pub fn classify(&self) -> AspectBucket {
        classify(*self)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Storage partition a video belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectBucket {
    Landscape,
    Portrait,
    Other,
}

impl AspectBucket {
    /// Path segment used when building the storage key.
    #[must_use]
    pub fn directory_name(self) -> &'static str {
        match self {
            AspectBucket::Landscape => "landscape",
            AspectBucket::Portrait => "portrait",
            AspectBucket::Other => "other",
        }
    }
}

impl fmt::Display for AspectBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory_name())
    }
}

/// Euclid's algorithm. `gcd(a, 0) == a`.
#[must_use]
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Sorts dimensions into a bucket. Landscape is tested first.
#[must_use]
pub fn classify(dimensions: Dimensions) -> AspectBucket {
    let (w, h) = dimensions.reduced();
    let (w, h) = (u64::from(w), u64::from(h));

    if w == 16 * h / 9 {
        AspectBucket::Landscape
    } else if h == 16 * w / 9 {
        AspectBucket::Portrait
    } else {
        AspectBucket::Other
    }
}

/// Probes `path` and returns its bucket together with the probed size.
pub fn classify_file<P: MediaProber + ?Sized>(
    prober: &P,
    path: &Path,
) -> Result<(AspectBucket, Dimensions), ProbeError> {
    let dimensions = prober.probe_dimensions(path)?;
    let bucket = dimensions.classify();
    log::debug!(
        "Classified {} as {} ({}, reduced {:?})",
        path.display(),
        bucket,
        dimensions,
        dimensions.reduced()
    );
    Ok((bucket, dimensions))
}

/// Directory token (`landscape`, `portrait` or `other`) for the video at `path`.
pub fn resolve_bucket_directory<P: MediaProber + ?Sized>(
    prober: &P,
    path: &Path,
) -> Result<&'static str, ProbeError> {
    classify_file(prober, path).map(|(bucket, _)| bucket.directory_name())
}

/// Outcome of classifying one file in a batch.
#[derive(Debug)]
pub struct FileClassification {
    pub path: PathBuf,
    pub result: Result<(AspectBucket, Dimensions), ProbeError>,
}

/// Classifies many files concurrently. Results keep the input order.
pub fn classify_files<P: MediaProber + ?Sized>(
    prober: &P,
    paths: &[PathBuf],
) -> Vec<FileClassification> {
    paths
        .par_iter()
        .map(|path| FileClassification {
            path: path.clone(),
            result: classify_file(prober, path),
        })
        .collect()
}
