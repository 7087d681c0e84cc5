//! Missing-value detection and per-type validation/coercion.
//!
//! A cell is missing when it is absent, JSON null, or a string that trims
//! to nothing. Present cells are validated against the field's declared
//! type and coerced to a canonical value; coerced text is what the privacy
//! scanner operates on.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::models::FieldType;

/// Canonical ISO-8601 layout with millisecond precision.
const ISO_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A value that passed type validation for its declared field type.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    /// String field content, or a canonical ISO-8601 timestamp
    Text(String),
    /// Finite number
    Float(f64),
    /// Boolean value
    Flag(bool),
}

/// Returns true when the cell is absent, null, or blank text.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Validates a present value against the declared type.
///
/// Returns the coerced value, or `None` when the value does not conform.
pub fn validate_value(value: &Value, field_type: FieldType) -> Option<CoercedValue> {
    match field_type {
        FieldType::Number => coerce_number(value),
        FieldType::Boolean => coerce_boolean(value),
        FieldType::Timestamp => parse_timestamp(value)
            .map(|dt| CoercedValue::Text(dt.format(ISO_MILLIS).to_string())),
        FieldType::String => coerce_string(value),
    }
}

/// Renders a raw value for issue messages.
pub fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}

fn coerce_number(value: &Value) -> Option<CoercedValue> {
    let numeric = match value {
        Value::Number(n) => n.as_f64()?,
        // Booleans coerce to 1/0, matching loose numeric conversion rules
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    numeric.is_finite().then_some(CoercedValue::Float(numeric))
}

fn coerce_boolean(value: &Value) -> Option<CoercedValue> {
    match value {
        Value::Bool(b) => Some(CoercedValue::Flag(*b)),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(CoercedValue::Flag(true)),
            "false" | "0" | "no" => Some(CoercedValue::Flag(false)),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_string(value: &Value) -> Option<CoercedValue> {
    match value {
        Value::String(s) => Some(CoercedValue::Text(s.trim().to_string())),
        Value::Number(n) => Some(CoercedValue::Text(n.to_string())),
        Value::Bool(b) => Some(CoercedValue::Text(b.to_string())),
        _ => None,
    }
}

/// Parses a timestamp from an epoch-millisecond number or a date string.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

/// Attempts the common date layouts, most specific first.
fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y/%m/%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_missing() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&json!(null))));
        assert!(is_missing(Some(&json!(""))));
        assert!(is_missing(Some(&json!("   \t"))));
        assert!(!is_missing(Some(&json!("x"))));
        assert!(!is_missing(Some(&json!(0))));
        assert!(!is_missing(Some(&json!(false))));
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(
            validate_value(&json!(1.5), FieldType::Number),
            Some(CoercedValue::Float(1.5))
        );
        assert_eq!(
            validate_value(&json!("  -3.25 "), FieldType::Number),
            Some(CoercedValue::Float(-3.25))
        );
        // Booleans convert to 1/0
        assert_eq!(
            validate_value(&json!(true), FieldType::Number),
            Some(CoercedValue::Float(1.0))
        );
        assert_eq!(validate_value(&json!("abc"), FieldType::Number), None);
        assert_eq!(validate_value(&json!([1]), FieldType::Number), None);
    }

    #[test]
    fn test_boolean_tokens() {
        for token in ["true", "TRUE", "1", "Yes"] {
            assert_eq!(
                validate_value(&json!(token), FieldType::Boolean),
                Some(CoercedValue::Flag(true)),
                "token {token}"
            );
        }
        for token in ["false", "0", "NO"] {
            assert_eq!(
                validate_value(&json!(token), FieldType::Boolean),
                Some(CoercedValue::Flag(false)),
                "token {token}"
            );
        }
        assert_eq!(
            validate_value(&json!(false), FieldType::Boolean),
            Some(CoercedValue::Flag(false))
        );
        assert_eq!(validate_value(&json!("maybe"), FieldType::Boolean), None);
        // Native numbers are not boolean tokens
        assert_eq!(validate_value(&json!(1), FieldType::Boolean), None);
    }

    #[test]
    fn test_timestamp_from_rfc3339() {
        let coerced = validate_value(&json!("2024-05-21T09:10:34.000Z"), FieldType::Timestamp);
        assert_eq!(
            coerced,
            Some(CoercedValue::Text("2024-05-21T09:10:34.000Z".to_string()))
        );
    }

    #[test]
    fn test_timestamp_from_offset_normalizes_to_utc() {
        let coerced = validate_value(&json!("2024-05-21T11:10:34+02:00"), FieldType::Timestamp);
        assert_eq!(
            coerced,
            Some(CoercedValue::Text("2024-05-21T09:10:34.000Z".to_string()))
        );
    }

    #[test]
    fn test_timestamp_from_epoch_millis() {
        // 2024-06-01T12:00:00.000Z
        let coerced = validate_value(&json!(1_717_243_200_000_i64), FieldType::Timestamp);
        assert_eq!(
            coerced,
            Some(CoercedValue::Text("2024-06-01T12:00:00.000Z".to_string()))
        );
    }

    #[test]
    fn test_timestamp_from_bare_date() {
        let coerced = validate_value(&json!("2024-05-21"), FieldType::Timestamp);
        assert_eq!(
            coerced,
            Some(CoercedValue::Text("2024-05-21T00:00:00.000Z".to_string()))
        );
    }

    #[test]
    fn test_timestamp_invalid() {
        assert_eq!(validate_value(&json!("not a date"), FieldType::Timestamp), None);
        assert_eq!(validate_value(&json!(true), FieldType::Timestamp), None);
        assert_eq!(
            validate_value(&json!("2024-13-45"), FieldType::Timestamp),
            None
        );
    }

    #[test]
    fn test_string_accepts_scalars() {
        assert_eq!(
            validate_value(&json!("  hello "), FieldType::String),
            Some(CoercedValue::Text("hello".to_string()))
        );
        assert_eq!(
            validate_value(&json!(42), FieldType::String),
            Some(CoercedValue::Text("42".to_string()))
        );
        assert_eq!(
            validate_value(&json!(true), FieldType::String),
            Some(CoercedValue::Text("true".to_string()))
        );
        assert_eq!(validate_value(&json!({"a": 1}), FieldType::String), None);
        assert_eq!(validate_value(&json!([1, 2]), FieldType::String), None);
    }

    #[test]
    fn test_display_raw() {
        assert_eq!(display_raw(&json!("text")), "text");
        assert_eq!(display_raw(&json!(1.5)), "1.5");
        assert_eq!(display_raw(&json!(false)), "false");
        assert_eq!(display_raw(&json!([1, 2])), "[1,2]");
    }
}
