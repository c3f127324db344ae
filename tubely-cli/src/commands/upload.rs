// tubely-cli/src/commands/upload.rs
//
// Runs local files through the ingest pipeline, the same path an HTTP
// upload takes, and stores the result in the local asset directory.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::cli::UploadArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output;
use tubely_core::utils::media_type_from_extension;
use tubely_core::{
    AppConfig, FfprobeProber, Ingestor, LocalStore, SidecarSpawner, StoredAsset, ingest_thumbnail,
};

/// Runs `upload-video`.
pub fn run_upload_video(config: &AppConfig, args: &UploadArgs) -> CliResult<()> {
    let content_type = content_type_for(args)?;
    let mut body = open_upload(&args.file)?;

    let prober = FfprobeProber::new(&config.ffprobe_path).with_timeout(config.probe_timeout);
    let store = LocalStore::from_config(config);
    let ingestor = Ingestor::new(config, &prober, &SidecarSpawner, &store);

    let asset = ingestor
        .ingest_video(&mut body, &content_type)
        .cli_with_context(|| format!("Failed to ingest {}", args.file.display()))?;
    report(&asset, args.json)
}

/// Runs `upload-thumbnail`.
pub fn run_upload_thumbnail(config: &AppConfig, args: &UploadArgs) -> CliResult<()> {
    let content_type = content_type_for(args)?;
    let mut body = open_upload(&args.file)?;
    let store = LocalStore::from_config(config);

    let asset = ingest_thumbnail(config, &store, &mut body, &content_type)
        .cli_with_context(|| format!("Failed to ingest {}", args.file.display()))?;
    report(&asset, args.json)
}

/// The explicit `--content-type`, or a guess from the file extension.
fn content_type_for(args: &UploadArgs) -> CliResult<String> {
    match &args.content_type {
        Some(content_type) => Ok(content_type.clone()),
        None => media_type_from_extension(&args.file)
            .map(str::to_string)
            .cli_with_context(|| {
                format!(
                    "Cannot guess the content type of {}; pass --content-type",
                    args.file.display()
                )
            }),
    }
}

fn open_upload(path: &Path) -> CliResult<BufReader<File>> {
    let file = File::open(path).cli_with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn report(asset: &StoredAsset, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(asset)?);
    } else {
        output::print_stored_asset(asset);
    }
    Ok(())
}
