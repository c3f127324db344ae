// tubely-cli/src/output.rs
//
// Styled terminal output. `console` drops the colors when stdout or stderr
// is not a terminal, so piped output stays plain.

use console::style;
use std::fmt::Display;
use std::path::Path;

use tubely_core::{AspectBucket, Dimensions, StoredAsset, format_bytes};

const SUCCESS_SYMBOL: &str = "✓";
const ERROR_SYMBOL: &str = "✗";

/// Print an error message with red styling
pub fn print_error(message: impl Display) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}

/// Print a success message with a green checkmark
pub fn print_success(message: impl Display) {
    println!("{} {}", style(SUCCESS_SYMBOL).green().bold(), message);
}

/// Print a failed check to stderr
pub fn print_failure(message: impl Display) {
    eprintln!("{} {}", style(ERROR_SYMBOL).red().bold(), message);
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    println!("{}: {}", style(label).cyan(), value);
}

/// One line of `classify` output: `<file>: <bucket> (<w>x<h>)`.
pub fn print_classification(path: &Path, bucket: AspectBucket, dimensions: Dimensions) {
    println!(
        "{}: {} ({})",
        path.display(),
        style(bucket).bold(),
        dimensions
    );
}

/// Summary of a stored asset.
pub fn print_stored_asset(asset: &StoredAsset) {
    print_success(format!("Stored {} {}", asset.kind, asset.key));
    print_info("URL", &asset.url);
    print_info("Type", &asset.content_type);
    print_info("Size", format_bytes(asset.size));
    if let (Some(bucket), Some(dimensions)) = (asset.bucket, asset.dimensions) {
        print_info("Aspect", format!("{bucket} ({dimensions})"));
    }
}
