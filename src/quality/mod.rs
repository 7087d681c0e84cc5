//! Dataset quality analysis.
//!
//! This module implements the per-row analysis pass and its supporting
//! pieces:
//! - **Values**: missing detection and per-type validation/coercion
//! - **Privacy**: ordered regex detectors for sensitive substrings
//! - **Analyzer**: the combined field/duplicate/privacy pass
//! - **Scoring**: 0-100 score with an itemized penalty breakdown
//!
//! Analysis never fails on row content: defects become issues and
//! penalties, not errors.

mod analyzer;
mod privacy;
mod scoring;
mod values;

// Re-export public API
pub use analyzer::{analyze_rows, RowAnalysis};
pub use privacy::{PrivacyFinding, PrivacyPattern, PrivacyScanner};
pub use scoring::compute_score;
pub use values::{display_raw, is_missing, validate_value, CoercedValue};
