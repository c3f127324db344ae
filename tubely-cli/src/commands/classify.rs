// tubely-cli/src/commands/classify.rs
//
// Probes each input with ffprobe and prints its aspect bucket.

use serde_json::json;

use crate::cli::ClassifyArgs;
use crate::error::CliResult;
use crate::output;
use tubely_core::aspect::FileClassification;
use tubely_core::{AppConfig, CoreError, FfprobeProber, classify_files};

/// Runs `classify`. Every file is attempted; the command fails if any of them failed.
pub fn run_classify(config: &AppConfig, args: &ClassifyArgs) -> CliResult<()> {
    let prober = FfprobeProber::new(&config.ffprobe_path).with_timeout(config.probe_timeout);
    log::debug!("Classifying {} file(s) with {}", args.files.len(), prober.binary().display());

    let results = classify_files(&prober, &args.files);
    let failed = results.iter().filter(|r| r.result.is_err()).count();

    if args.json {
        let report = to_json(&results);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for entry in &results {
            match &entry.result {
                Ok((bucket, dimensions)) => {
                    output::print_classification(&entry.path, *bucket, *dimensions)
                }
                Err(e) => output::print_error(format!("{}: {}", entry.path.display(), e)),
            }
        }
    }

    if failed > 0 {
        return Err(CoreError::OperationFailed(format!(
            "{} of {} file(s) could not be classified",
            failed,
            results.len()
        )));
    }
    Ok(())
}

fn to_json(results: &[FileClassification]) -> serde_json::Value {
    results
        .iter()
        .map(|entry| match &entry.result {
            Ok((bucket, dimensions)) => json!({
                "path": entry.path,
                "bucket": bucket,
                "width": dimensions.width(),
                "height": dimensions.height(),
            }),
            Err(e) => json!({
                "path": entry.path,
                "error": e.to_string(),
            }),
        })
        .collect()
}
