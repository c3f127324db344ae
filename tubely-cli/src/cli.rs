// tubely-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Tubely: video ingest tools",
    long_about = "Classifies videos by aspect ratio with ffprobe, remuxes them for fast start \
                  with ffmpeg, and stores uploads in the local asset directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Settings shared by every subcommand. Each can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Port of the asset server, used to build local asset URLs
    #[arg(
        long,
        global = true,
        env = "PORT",
        default_value_t = tubely_core::config::DEFAULT_PORT
    )]
    pub port: u16,

    /// Directory where stored assets are written
    #[arg(
        long,
        global = true,
        env = "ASSETS_ROOT",
        value_name = "DIR",
        default_value = tubely_core::config::DEFAULT_ASSETS_ROOT
    )]
    pub assets_root: PathBuf,

    /// Parent directory for temporary upload files (defaults to the system temp dir)
    #[arg(long, global = true, env = "TUBELY_TEMP_DIR", value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Object storage bucket
    #[arg(long, global = true, env = "S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// Object storage region
    #[arg(long, global = true, env = "S3_REGION")]
    pub s3_region: Option<String>,

    /// Public base URL serving stored videos (e.g. https://d111111abcdef8.cloudfront.net)
    #[arg(long, global = true, env = "S3_CF_DISTRO", value_name = "URL")]
    pub s3_cf_distribution: Option<String>,

    /// ffprobe binary
    #[arg(
        long,
        global = true,
        env = "TUBELY_FFPROBE",
        value_name = "PATH",
        default_value = tubely_core::external::DEFAULT_FFPROBE
    )]
    pub ffprobe: PathBuf,

    /// ffmpeg binary
    #[arg(
        long,
        global = true,
        env = "TUBELY_FFMPEG",
        value_name = "PATH",
        default_value = tubely_core::external::DEFAULT_FFMPEG
    )]
    pub ffmpeg: PathBuf,

    /// Kill ffprobe after this many seconds (no limit when unset)
    #[arg(long, global = true, env = "TUBELY_PROBE_TIMEOUT", value_name = "SECONDS")]
    pub probe_timeout: Option<f64>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints the aspect bucket (landscape, portrait, other) of each video
    Classify(ClassifyArgs),
    /// Rewrites an mp4 so playback can start before the download finishes
    Faststart(FaststartArgs),
    /// Runs a video through the full ingest pipeline into the asset store
    UploadVideo(UploadArgs),
    /// Stores a thumbnail image in the asset store
    UploadThumbnail(UploadArgs),
    /// Verifies that ffprobe and ffmpeg can be started
    Check,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Video files to classify
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Print results as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FaststartArgs {
    /// mp4 file to remux; output is written to <FILE>.processing
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// File to upload
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Content-Type of the upload (guessed from the extension when omitted)
    #[arg(long, value_name = "TYPE")]
    pub content_type: Option<String>,

    /// Print the stored asset as JSON
    #[arg(long)]
    pub json: bool,
}
