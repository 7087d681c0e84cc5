//! Per-row analysis pass.
//!
//! Walks every row once, in order, doing field validation, duplicate-key
//! tracking, and privacy scanning in a single combined pass, then runs the
//! schema's threshold checks. Row order is load-bearing: duplicate
//! first-occurrence semantics and row-numbered issues both depend on it.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::models::{
    FieldStat, Issue, IssueLog, Row, SchemaDefinition, SchemaField, ValidationMetrics,
};

use super::privacy::PrivacyScanner;
use super::values::{self, CoercedValue};

/// Result of the per-row pass: metrics plus the open issue log.
///
/// The log stays open so the report assembler can append its summary issue
/// under the same cap.
#[derive(Debug)]
pub struct RowAnalysis {
    /// Aggregate metrics for the analyzed rows
    pub metrics: ValidationMetrics,
    /// Capped issues in pipeline order
    pub issues: IssueLog,
}

/// Analyzes parsed rows against a schema definition.
///
/// Per-row defects (missing, invalid, duplicate, privacy) are never fatal;
/// they accumulate as issues and counters. Every schema field gets exactly
/// one `field_stats` entry even when its counters stay at zero.
pub fn analyze_rows(
    rows: &[Row],
    schema: &SchemaDefinition,
    scanner: &PrivacyScanner,
) -> RowAnalysis {
    let mut issues = IssueLog::new();
    let mut field_stats: BTreeMap<String, FieldStat> = schema
        .fields
        .iter()
        .map(|field| (field.name.clone(), FieldStat::default()))
        .collect();

    let mut privacy_findings: u64 = 0;
    let mut duplicate_count: usize = 0;
    let mut duplicate_tracker: HashMap<String, u64> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;

        for field in &schema.fields {
            analyze_cell(
                row,
                field,
                row_number,
                scanner,
                &mut field_stats,
                &mut privacy_findings,
                &mut issues,
            );
        }

        if let Some(keys) = schema.duplicate_keys.as_deref().filter(|k| !k.is_empty()) {
            let key = composite_key(row, keys);
            if !key.is_empty() {
                let seen = duplicate_tracker.entry(key).or_insert(0);
                if *seen > 0 {
                    duplicate_count += 1;
                    issues.push(
                        Issue::warn(
                            "schema.duplicate_row",
                            format!("Duplicate key detected for {}", keys.join("+")),
                        )
                        .with_row(row_number),
                    );
                }
                *seen += 1;
            }
        }
    }

    let metrics = build_metrics(
        rows.len(),
        schema,
        field_stats,
        duplicate_count,
        privacy_findings,
    );

    check_field_thresholds(schema, &metrics, &mut issues);

    if let Some(min_rows) = schema.min_rows {
        if rows.len() < min_rows {
            issues.push(Issue::warn(
                "schema.too_few_rows",
                format!(
                    "Dataset only has {} rows. Recommended minimum is {}.",
                    rows.len(),
                    min_rows
                ),
            ));
        }
    }

    RowAnalysis { metrics, issues }
}

/// Validates one cell: missingness, then type conformance, then privacy.
fn analyze_cell(
    row: &Row,
    field: &SchemaField,
    row_number: usize,
    scanner: &PrivacyScanner,
    field_stats: &mut BTreeMap<String, FieldStat>,
    privacy_findings: &mut u64,
    issues: &mut IssueLog,
) {
    let raw = row.get(&field.name);

    if values::is_missing(raw) {
        if let Some(stats) = field_stats.get_mut(&field.name) {
            stats.missing += 1;
        }
        if field.required {
            issues.push(
                Issue::warn(
                    "schema.missing_field",
                    format!("Missing value for required field \"{}\"", field.name),
                )
                .with_field(&field.name)
                .with_row(row_number),
            );
        }
        return;
    }

    let Some(raw) = raw else {
        return;
    };

    match values::validate_value(raw, field.field_type) {
        None => {
            if let Some(stats) = field_stats.get_mut(&field.name) {
                stats.invalid += 1;
            }
            issues.push(
                Issue::warn(
                    "schema.invalid_type",
                    format!(
                        "Value \"{}\" does not match {}",
                        values::display_raw(raw),
                        field.field_type
                    ),
                )
                .with_field(&field.name)
                .with_row(row_number),
            );
        }
        Some(CoercedValue::Text(text)) => {
            for finding in scanner.scan(&text) {
                *privacy_findings += finding.matches;
                issues.push(
                    Issue::error(
                        finding.code,
                        format!("Detected {}: {}", finding.label, finding.fragment),
                    )
                    .with_field(&field.name)
                    .with_row(row_number),
                );
            }
        }
        Some(_) => {}
    }
}

/// Builds the composite duplicate key for a row: each key field's value
/// stringified, trimmed, lowercased, and joined with `::`.
fn composite_key(row: &Row, keys: &[String]) -> String {
    keys.iter()
        .map(|name| key_part(row.get(name)))
        .collect::<Vec<_>>()
        .join("::")
}

/// Stringifies a key field value. Absent and null cells become the empty
/// string so partially-keyed rows still participate.
fn key_part(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    };
    text.trim().to_lowercase()
}

fn build_metrics(
    row_count: usize,
    schema: &SchemaDefinition,
    field_stats: BTreeMap<String, FieldStat>,
    duplicate_count: usize,
    privacy_findings: u64,
) -> ValidationMetrics {
    let total_cells = (row_count * schema.fields.len()) as f64;
    let total_missing: u64 = field_stats.values().map(|s| s.missing).sum();
    let total_invalid: u64 = field_stats.values().map(|s| s.invalid).sum();

    ValidationMetrics {
        row_count,
        missing_rate: if total_cells > 0.0 {
            total_missing as f64 / total_cells
        } else {
            0.0
        },
        invalid_rate: if total_cells > 0.0 {
            total_invalid as f64 / total_cells
        } else {
            0.0
        },
        duplicate_rate: if row_count > 0 {
            duplicate_count as f64 / row_count as f64
        } else {
            0.0
        },
        privacy_findings,
        field_stats,
    }
}

/// Emits threshold issues for fields whose observed missing/invalid rate
/// exceeds the declared maximum. Per-field rates use the row count as
/// denominator, unlike the cell-based aggregate rates.
fn check_field_thresholds(
    schema: &SchemaDefinition,
    metrics: &ValidationMetrics,
    issues: &mut IssueLog,
) {
    let row_count = metrics.row_count as f64;
    if row_count == 0.0 {
        return;
    }

    for field in &schema.fields {
        let Some(stats) = metrics.field_stats.get(&field.name) else {
            continue;
        };
        let missing_rate = stats.missing as f64 / row_count;
        let invalid_rate = stats.invalid as f64 / row_count;

        if let Some(max) = field.max_missing_rate {
            if missing_rate > max {
                issues.push(
                    Issue::warn(
                        "schema.missing_threshold",
                        format!(
                            "Missing rate {:.1}% exceeds threshold {:.1}%",
                            missing_rate * 100.0,
                            max * 100.0
                        ),
                    )
                    .with_field(&field.name),
                );
            }
        }

        if let Some(max) = field.max_invalid_rate {
            if invalid_rate > max {
                issues.push(
                    Issue::warn(
                        "schema.invalid_threshold",
                        format!(
                            "Invalid rate {:.1}% exceeds threshold {:.1}%",
                            invalid_rate * 100.0,
                            max * 100.0
                        ),
                    )
                    .with_field(&field.name),
                );
            }
        }
    }
}
