//! Small text and filesystem helpers shared across the crate.
//!
//! - Whitespace normalization for extracted element text
//! - String truncation for log previews
//! - Output directory validation for the batch CLI

use crate::error::Result;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Collapse every run of whitespace into a single space and trim the ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_whitespace("  Breaking\n\t news "), "Breaking news");
/// ```
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (moved back to the nearest character
/// boundary) with an ellipsis and byte count appended.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = Path::new(path).join("..__probe_write__");
    fs::write(&probe_path, b"").await?;
    if let Err(e) = fs::remove_file(&probe_path).await {
        warn!(probe = %probe_path.display(), error = %e, "Could not remove write probe");
    }
    info!("Output directory is writable");
    Ok(())
}
