//! JSON output for batch runs.
//!
//! # Output Structure
//!
//! Files are grouped by run date, one file per run:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── records-081500.json
//!     └── records-203000.json
//! ```

use crate::error::Result;
use crate::record::ExtractionBatch;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// File name for a batch, derived from its `HH:MM:SS` run time.
fn file_name(batch: &ExtractionBatch) -> String {
    let stamp: String = batch.local_time.chars().filter(char::is_ascii_digit).collect();
    format!("records-{stamp}.json")
}

/// Write an [`ExtractionBatch`] to a JSON file under a per-date directory.
///
/// # Arguments
///
/// * `batch` - The records and failures of one run
/// * `json_output_dir` - Base directory for JSON output
///
/// # Returns
///
/// The path of the written file.
///
/// # Output Path
///
/// The file is written to: `{json_output_dir}/{local_date}/records-{HHMMSS}.json`
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_batch(batch: &ExtractionBatch, json_output_dir: &str) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(batch)?;

    let full_json_dir = Path::new(json_output_dir).join(&batch.local_date);
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(full_json_dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join(file_name(batch));
    fs::write(&path, json).await?;
    info!(
        path = %path.display(),
        records = batch.records.len(),
        failures = batch.failures.len(),
        "Wrote JSON records file"
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ExtractedFields, ExtractedRecord};

    fn sample_batch() -> ExtractionBatch {
        ExtractionBatch {
            local_date: "2025-05-06".to_string(),
            local_time: "20:30:15".to_string(),
            records: vec![ExtractedRecord::assemble(
                "https://example.com/a",
                ExtractedFields::default(),
            )],
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_file_name_from_time() {
        assert_eq!(file_name(&sample_batch()), "records-203015.json");
    }

    #[tokio::test]
    async fn test_write_batch_layout() {
        let base = std::env::temp_dir().join(format!("news_scrape_json_{}", std::process::id()));
        let base_str = base.to_string_lossy().to_string();

        let path = write_batch(&sample_batch(), &base_str).await.unwrap();

        assert_eq!(path, base.join("2025-05-06").join("records-203015.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        let back: ExtractionBatch = serde_json::from_str(&written).unwrap();
        assert_eq!(back, sample_batch());

        let _ = std::fs::remove_dir_all(&base);
    }
}
