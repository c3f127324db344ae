// tubely-cli/src/config.rs
//
// Turns parsed command-line arguments into a validated core AppConfig.

use std::time::Duration;

use crate::cli::GlobalArgs;
use crate::error::CliResult;
use tubely_core::{AppConfig, AppConfigBuilder, CoreError};

/// Builds the core configuration from the global CLI arguments.
pub fn build_config(args: &GlobalArgs) -> CliResult<AppConfig> {
    let mut builder = AppConfigBuilder::new()
        .port(args.port)
        .assets_root(&args.assets_root)
        .ffprobe_path(&args.ffprobe)
        .ffmpeg_path(&args.ffmpeg);

    if let Some(dir) = &args.temp_dir {
        builder = builder.temp_dir(dir);
    }
    if let Some(bucket) = &args.s3_bucket {
        builder = builder.s3_bucket(bucket);
    }
    if let Some(region) = &args.s3_region {
        builder = builder.s3_region(region);
    }
    if let Some(url) = &args.s3_cf_distribution {
        builder = builder.s3_cf_distribution(url);
    }
    if let Some(secs) = args.probe_timeout {
        builder = builder.probe_timeout(probe_timeout_from_secs(secs)?);
    }

    let config = builder.build();
    config.validate()?;
    log::debug!("Configuration: {:?}", config);
    Ok(config)
}

fn probe_timeout_from_secs(secs: f64) -> CliResult<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        CoreError::Config(format!(
            "probe timeout must be a non-negative number of seconds, got {secs}"
        ))
    })
}
