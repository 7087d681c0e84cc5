//! Validation pipeline entry point.
//!
//! One invocation runs the linear pipeline: registry lookup, parse,
//! combined per-row analysis, scoring, report assembly. The engine keeps
//! no state between invocations beyond its read-only registry and compiled
//! privacy detectors, so a single engine can serve concurrent callers.

use chrono::Utc;

use crate::error::{DataproofError, Result};
use crate::models::{
    DatasetFormat, Issue, SchemaDefinition, ValidationMetrics, ValidationReport,
};
use crate::parser;
use crate::quality::{analyze_rows, compute_score, PrivacyScanner, RowAnalysis};
use crate::registry::SchemaRegistry;

/// Minimum score for a passing report (privacy findings veto regardless).
const PASS_SCORE: u32 = 70;

/// Timestamp layout for `generatedAt`.
const ISO_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Size limits for one validation run.
///
/// Byte and row limits are tunable for embedders; the issue cap is a hard
/// constant ([`crate::models::MAX_ISSUES`]).
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Byte limit applied to trimmed dataset content
    pub max_bytes: usize,
    /// Maximum number of parsed rows
    pub max_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_bytes: 750_000,
            max_rows: 2_000,
        }
    }
}

impl EngineConfig {
    /// Creates a config with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the byte limit.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Builder method to set the row limit.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }
}

/// One validation request.
#[derive(Debug, Clone)]
pub struct ValidationInput {
    /// Display name for the submitted dataset
    pub dataset_name: String,
    /// Schema to validate against
    pub schema_id: String,
    /// Declared input format
    pub format: DatasetFormat,
    /// Raw dataset content
    pub content: String,
    /// Opaque storage reference to embed in the report, if the caller's
    /// notarization collaborator already produced one
    pub external_ref: Option<String>,
}

/// Successful validation outcome: the resolved schema and the report.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// The schema definition the dataset was validated against
    pub schema: SchemaDefinition,
    /// The assembled quality report
    pub report: ValidationReport,
}

/// Dataset validation engine.
///
/// # Example
///
/// ```
/// use dataproof::{DatasetFormat, SchemaRegistry, ValidationEngine, ValidationInput};
///
/// let engine = ValidationEngine::new(SchemaRegistry::builtin());
/// let outcome = engine.run(ValidationInput {
///     dataset_name: "prompts".to_string(),
///     schema_id: "ai_prompts_v1".to_string(),
///     format: DatasetFormat::Csv,
///     content: "prompt_id,prompt_text\np1,Summarise the article\n".to_string(),
///     external_ref: None,
/// })?;
/// assert!(outcome.report.score <= 100);
/// # Ok::<(), dataproof::DataproofError>(())
/// ```
#[derive(Debug)]
pub struct ValidationEngine {
    registry: SchemaRegistry,
    config: EngineConfig,
    scanner: PrivacyScanner,
}

impl ValidationEngine {
    /// Creates an engine with default limits.
    pub fn new(registry: SchemaRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    /// Creates an engine with explicit limits.
    pub fn with_config(registry: SchemaRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            scanner: PrivacyScanner::new(),
        }
    }

    /// Returns the engine's schema registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Runs the full validation pipeline for one dataset.
    ///
    /// The pipeline is a pure function of its input: no retries, no
    /// partial results. A structural defect aborts before any row is
    /// scored; per-row defects accumulate as issues and penalties.
    ///
    /// # Errors
    /// Returns a typed error with a caller-facing status classification
    /// (see [`DataproofError::status_code`]).
    pub fn run(&self, input: ValidationInput) -> Result<ValidationOutcome> {
        let schema = self
            .registry
            .get(&input.schema_id)
            .ok_or_else(|| DataproofError::schema_not_found(&input.schema_id))?;

        if !schema.supports(input.format) {
            return Err(DataproofError::unsupported_format(
                &schema.id,
                input.format.to_string(),
            ));
        }

        let rows = parser::parse_rows(
            &input.content,
            input.format,
            self.config.max_bytes,
            self.config.max_rows,
        )?;

        let RowAnalysis {
            metrics,
            mut issues,
        } = analyze_rows(&rows, schema, &self.scanner);

        if metrics.privacy_findings > 0 {
            issues.push(Issue::error(
                "privacy.regex_hit",
                format!(
                    "Detected {} potential privacy leaks",
                    metrics.privacy_findings
                ),
            ));
        }

        let (score, score_breakdown) = compute_score(&metrics);
        let recommendations = build_recommendations(&metrics, schema);
        let passed = score >= PASS_SCORE && metrics.privacy_findings == 0;

        tracing::debug!(
            "Validated dataset '{}' against {}: score {}, passed {}",
            input.dataset_name,
            schema.id,
            score,
            passed
        );

        let report = ValidationReport {
            dataset_name: input.dataset_name,
            schema_id: schema.id.clone(),
            format: input.format,
            external_ref: input.external_ref,
            generated_at: Utc::now().format(ISO_MILLIS).to_string(),
            total_rows: metrics.row_count,
            passed,
            score,
            metrics,
            issues: issues.into_issues(),
            score_breakdown,
            recommendations,
        };

        Ok(ValidationOutcome {
            schema: schema.clone(),
            report,
        })
    }
}

/// Builds deterministic remediation advice, one fixed sentence per trigger,
/// in trigger order. Triggers fire independently so the list is
/// deduplicated by construction.
fn build_recommendations(metrics: &ValidationMetrics, schema: &SchemaDefinition) -> Vec<String> {
    let mut recommendations = Vec::new();

    if metrics.missing_rate > 0.05 {
        recommendations.push(
            "Fill in missing fields or provide defaults for sparse fields to reduce the missing rate."
                .to_string(),
        );
    }

    if metrics.invalid_rate > 0.05 {
        recommendations.push(
            "Normalize field types, for example convert numeric strings to floats, so values pass type validation."
                .to_string(),
        );
    }

    if metrics.duplicate_rate > 0.02 {
        recommendations.push(
            "Remove duplicate records or deduplicate the key field combination before upload."
                .to_string(),
        );
    }

    if metrics.privacy_findings > 0 {
        recommendations.push(
            "Remove or mask emails, phone numbers, and other personal data before publishing."
                .to_string(),
        );
    }

    if let Some(recommended) = schema.recommended_rows {
        if metrics.row_count < recommended {
            recommendations.push(format!(
                "Provide at least {recommended} sample rows for a stable score."
            ));
        }
    }

    recommendations
}
