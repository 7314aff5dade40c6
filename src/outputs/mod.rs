//! Output generation for batch runs.
//!
//! # Submodules
//!
//! - [`json`]: Writes an [`ExtractionBatch`](crate::record::ExtractionBatch) to a dated JSON file

pub mod json;
