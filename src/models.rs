//! Core data models for schema definitions and validation reports.
//!
//! This module defines the declarative schema types that describe what a
//! dataset should look like, and the report types the validation pipeline
//! produces. All wire-facing types serialize with camelCase field names so
//! reports round-trip with the published report format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum number of issues retained in a single report.
///
/// The cap is the pipeline's only resource bound: it keeps report size
/// proportional to the cap rather than to the dataset on pathological input.
pub const MAX_ISSUES: usize = 25;

/// Supported dataset input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// Comma-separated values with a header line
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl std::fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetFormat::Csv => write!(f, "csv"),
            DatasetFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Declared data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Any scalar value, coerced to text
    String,
    /// Finite floating point value
    Number,
    /// Native boolean or a true/false/0/1/yes/no token
    Boolean,
    /// Epoch number or parseable date string, canonicalized to ISO-8601
    Timestamp,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// A single field declaration within a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    /// Field name, unique within its schema
    pub name: String,
    /// Declared data type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether a missing value produces an issue
    #[serde(default)]
    pub required: bool,
    /// Human-readable description (not used in scoring)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Example value (not used in scoring)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Maximum tolerated missing rate for this field (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_missing_rate: Option<f64>,
    /// Maximum tolerated invalid rate for this field (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_invalid_rate: Option<f64>,
}

impl SchemaField {
    /// Creates a field declaration with the given name and type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            description: None,
            example: None,
            max_missing_rate: None,
            max_invalid_rate: None,
        }
    }

    /// Builder method to mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set an example value.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Builder method to set the maximum missing rate.
    pub fn with_max_missing_rate(mut self, rate: f64) -> Self {
        if !(0.0..=1.0).contains(&rate) {
            tracing::warn!(
                "max_missing_rate {} for field '{}' clamped to [0.0, 1.0]",
                rate,
                self.name
            );
        }
        self.max_missing_rate = Some(rate.clamp(0.0, 1.0));
        self
    }

    /// Builder method to set the maximum invalid rate.
    pub fn with_max_invalid_rate(mut self, rate: f64) -> Self {
        if !(0.0..=1.0).contains(&rate) {
            tracing::warn!(
                "max_invalid_rate {} for field '{}' clamped to [0.0, 1.0]",
                rate,
                self.name
            );
        }
        self.max_invalid_rate = Some(rate.clamp(0.0, 1.0));
        self
    }
}

/// Declarative description of a dataset category.
///
/// Definitions are immutable once constructed and are owned by the
/// [`SchemaRegistry`](crate::registry::SchemaRegistry).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    /// Unique schema identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Description of the dataset category
    pub description: String,
    /// Accepted input formats (non-empty)
    pub format: Vec<DatasetFormat>,
    /// Ordered field declarations
    pub fields: Vec<SchemaField>,
    /// Field names forming the composite duplicate key, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_keys: Option<Vec<String>>,
    /// Minimum row count before a warning is emitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<usize>,
    /// Row count recommended for a stable score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_rows: Option<usize>,
}

impl SchemaDefinition {
    /// Returns true when the schema accepts the given input format.
    pub fn supports(&self, format: DatasetFormat) -> bool {
        self.format.contains(&format)
    }
}

/// One parsed dataset record, mapping field names to raw values.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Severity level of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Finding that forces remediation (privacy hits)
    Error,
    /// Quality defect that lowers the score
    Warn,
}

/// A single validation finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Machine-readable code, e.g. `schema.missing_field`
    pub code: String,
    /// Severity level
    pub level: IssueLevel,
    /// Human-readable message
    pub message: String,
    /// Affected field, if the issue is field-scoped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Affected 1-based row number, if the issue is row-scoped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl Issue {
    /// Creates a warn-level issue.
    pub fn warn(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            level: IssueLevel::Warn,
            message: message.into(),
            field: None,
            row: None,
        }
    }

    /// Creates an error-level issue.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            level: IssueLevel::Error,
            message: message.into(),
            field: None,
            row: None,
        }
    }

    /// Builder method to scope the issue to a field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Builder method to scope the issue to a 1-based row number.
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

/// Bounded issue accumulator shared by all issue producers.
///
/// Pushes past [`MAX_ISSUES`] are rejected rather than truncated later, so
/// memory stays bounded by the cap regardless of dataset size. Producers
/// append in pipeline order, which gives first-come-first-served retention.
#[derive(Debug, Default)]
pub struct IssueLog {
    issues: Vec<Issue>,
}

impl IssueLog {
    /// Creates an empty issue log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an issue unless the cap has been reached.
    pub fn push(&mut self, issue: Issue) {
        if self.issues.len() < MAX_ISSUES {
            self.issues.push(issue);
        }
    }

    /// Number of retained issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true when no issues have been retained.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Consumes the log and returns the retained issues in arrival order.
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

/// Missing/invalid counters for a single field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStat {
    /// Count of missing cells
    pub missing: u64,
    /// Count of present cells that failed type validation
    pub invalid: u64,
}

/// Aggregate metrics for one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMetrics {
    /// Number of parsed rows
    pub row_count: usize,
    /// Fraction of missing cells across all schema fields (0.0-1.0)
    pub missing_rate: f64,
    /// Fraction of present cells failing type validation (0.0-1.0)
    pub invalid_rate: f64,
    /// Fraction of rows repeating an earlier composite key (0.0-1.0)
    pub duplicate_rate: f64,
    /// Total privacy pattern matches across all string values
    pub privacy_findings: u64,
    /// Per-field counters; exactly one entry per schema field
    pub field_stats: BTreeMap<String, FieldStat>,
}

/// One itemized point deduction contributing to the final score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Penalty category label
    pub label: String,
    /// Points deducted (positive)
    pub deduction: u32,
    /// Human-readable reason with formatted percentages
    pub reason: String,
}

/// The final, immutable quality report for one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Caller-supplied dataset name
    pub dataset_name: String,
    /// Identifier of the schema the dataset was validated against
    pub schema_id: String,
    /// Input format of the dataset
    pub format: DatasetFormat,
    /// Opaque storage reference supplied by the notarization collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
    /// ISO-8601 generation timestamp
    pub generated_at: String,
    /// Number of parsed rows
    pub total_rows: usize,
    /// True iff score >= 70 and no privacy findings
    pub passed: bool,
    /// Quality score, clamped to 0-100
    pub score: u32,
    /// Aggregate metrics
    pub metrics: ValidationMetrics,
    /// Capped issue list in pipeline order
    pub issues: Vec<Issue>,
    /// Non-zero penalty entries in application order
    pub score_breakdown: Vec<ScoreBreakdown>,
    /// Deterministic remediation advice, one entry per trigger
    pub recommendations: Vec<String>,
}
