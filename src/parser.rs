//! Dataset parsing for CSV and JSONL input.
//!
//! Parsing is fail-fast: the first structural defect aborts the run with a
//! typed error before any analysis happens. Per-row quality problems are
//! not the parser's concern; it only guarantees an ordered sequence of
//! rows within the configured size limits.

use serde_json::Value;

use crate::error::{DataproofError, Result};
use crate::models::{DatasetFormat, Row};

/// Parses raw dataset content into ordered rows.
///
/// # Arguments
/// * `content` - Raw dataset text
/// * `format` - Declared input format
/// * `max_bytes` - Byte limit applied to the trimmed content
/// * `max_rows` - Maximum number of parsed rows
///
/// # Errors
/// Returns a 400-classified error for empty content, oversized content,
/// malformed lines, zero rows, or too many rows.
pub fn parse_rows(
    content: &str,
    format: DatasetFormat,
    max_bytes: usize,
    max_rows: usize,
) -> Result<Vec<Row>> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(DataproofError::EmptyDataset);
    }

    if trimmed.len() > max_bytes {
        return Err(DataproofError::DatasetTooLarge {
            limit_bytes: max_bytes,
        });
    }

    let rows = match format {
        DatasetFormat::Csv => parse_csv(trimmed)?,
        DatasetFormat::Jsonl => parse_jsonl(trimmed)?,
    };

    if rows.is_empty() {
        return Err(DataproofError::NoRows);
    }

    if rows.len() > max_rows {
        return Err(DataproofError::RowLimitExceeded { limit: max_rows });
    }

    tracing::debug!("Parsed {} rows from {} input", rows.len(), format);
    Ok(rows)
}

/// Parses CSV content with a header line, quoted fields, and trimming.
///
/// Blank lines are skipped by the reader. Structural defects (unbalanced
/// quotes, ragged records) abort with the reader's line position.
fn parse_csv(content: &str) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error_to_malformed)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error_to_malformed)?;
        let mut row = Row::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), Value::String(value.to_string()));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Maps a csv reader error to a malformed-line error with its position.
fn csv_error_to_malformed(error: csv::Error) -> DataproofError {
    let line = error
        .position()
        .map(|p| usize::try_from(p.line()).unwrap_or(usize::MAX))
        .unwrap_or(1);
    tracing::debug!("CSV parse failure on line {}: {}", line, error);
    DataproofError::MalformedLine { line }
}

/// Parses JSONL content, one JSON object per non-empty line.
///
/// Line numbers in errors count non-empty lines only, matching the
/// row numbering used by the analyzer.
fn parse_jsonl(content: &str) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for (index, line) in content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
    {
        let value: Value = serde_json::from_str(line)
            .map_err(|_| DataproofError::MalformedLine { line: index + 1 })?;
        match value {
            Value::Object(row) => rows.push(row),
            _ => return Err(DataproofError::MalformedLine { line: index + 1 }),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_BYTES: usize = 750_000;
    const MAX_ROWS: usize = 2_000;

    fn parse(content: &str, format: DatasetFormat) -> Result<Vec<Row>> {
        parse_rows(content, format, MAX_BYTES, MAX_ROWS)
    }

    #[test]
    fn test_csv_basic() {
        let rows = parse("id,name\n1,Alice\n2,Bob\n", DatasetFormat::Csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], Value::String("1".to_string()));
        assert_eq!(rows[1]["name"], Value::String("Bob".to_string()));
    }

    #[test]
    fn test_csv_quoted_fields_and_trimming() {
        let rows = parse(
            "id,comment\n1,\"hello, world\"\n2,  padded  \n",
            DatasetFormat::Csv,
        )
        .unwrap();
        assert_eq!(rows[0]["comment"], Value::String("hello, world".to_string()));
        assert_eq!(rows[1]["comment"], Value::String("padded".to_string()));
    }

    #[test]
    fn test_csv_bom_stripped() {
        let rows = parse("\u{feff}id,name\n1,Alice\n", DatasetFormat::Csv).unwrap();
        assert_eq!(rows[0]["id"], Value::String("1".to_string()));
        assert!(rows[0].contains_key("name"));
    }

    #[test]
    fn test_csv_blank_lines_skipped() {
        let rows = parse("id,name\n1,Alice\n\n\n2,Bob\n", DatasetFormat::Csv).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_csv_ragged_record_is_malformed() {
        let err = parse("id,name\n1,Alice\n2\n", DatasetFormat::Csv).unwrap_err();
        assert!(matches!(err, DataproofError::MalformedLine { .. }));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_jsonl_basic() {
        let rows = parse(
            "{\"id\": 1, \"ok\": true}\n{\"id\": 2, \"ok\": false}",
            DatasetFormat::Jsonl,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], Value::from(1));
        assert_eq!(rows[1]["ok"], Value::Bool(false));
    }

    #[test]
    fn test_jsonl_empty_lines_skipped() {
        let rows = parse("{\"id\": 1}\n\n   \n{\"id\": 2}\n", DatasetFormat::Jsonl).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_jsonl_malformed_line_aborts() {
        let err = parse("{\"id\": 1}\nnot json\n{\"id\": 3}", DatasetFormat::Jsonl).unwrap_err();
        assert!(matches!(err, DataproofError::MalformedLine { line: 2 }));
    }

    #[test]
    fn test_jsonl_non_object_line_aborts() {
        let err = parse("{\"id\": 1}\n[1, 2, 3]", DatasetFormat::Jsonl).unwrap_err();
        assert!(matches!(err, DataproofError::MalformedLine { line: 2 }));
    }

    #[test]
    fn test_empty_content() {
        let err = parse("   \n  ", DatasetFormat::Csv).unwrap_err();
        assert!(matches!(err, DataproofError::EmptyDataset));
    }

    #[test]
    fn test_too_large_content() {
        let big = format!("id\n{}", "x\n".repeat(400_000));
        let err = parse(&big, DatasetFormat::Csv).unwrap_err();
        assert!(matches!(err, DataproofError::DatasetTooLarge { .. }));
    }

    #[test]
    fn test_header_only_csv_has_no_rows() {
        let err = parse("id,name\n", DatasetFormat::Csv).unwrap_err();
        assert!(matches!(err, DataproofError::NoRows));
    }

    #[test]
    fn test_row_limit_exceeded() {
        let mut content = String::from("{\"id\": 1}\n").repeat(MAX_ROWS + 1);
        content.push('\n');
        let err = parse(&content, DatasetFormat::Jsonl).unwrap_err();
        assert!(matches!(
            err,
            DataproofError::RowLimitExceeded { limit: MAX_ROWS }
        ));
    }
}
