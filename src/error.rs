//! Error types for the validation pipeline.
//!
//! Every failure the pipeline can surface carries a caller-facing status
//! classification. Structural defects abort the run before any row is
//! scored; per-row defects are never errors and accumulate as issues
//! instead.

use thiserror::Error;

/// Main error type for dataproof operations.
///
/// The pipeline is fail-fast: the first structural problem terminates the
/// invocation. There are no retries and no partial results.
#[derive(Debug, Error)]
pub enum DataproofError {
    /// The requested schema id is not registered
    #[error("Schema {schema_id} not found")]
    SchemaNotFound { schema_id: String },

    /// The schema does not accept the submitted input format
    #[error("Schema {schema_id} does not support {format} input")]
    UnsupportedFormat { schema_id: String, format: String },

    /// Dataset content is empty after trimming
    #[error("Dataset content is empty")]
    EmptyDataset,

    /// Dataset content exceeds the byte limit
    #[error("Dataset exceeds the {limit_bytes} byte limit")]
    DatasetTooLarge { limit_bytes: usize },

    /// Parsing produced zero rows
    #[error("Dataset contains no rows")]
    NoRows,

    /// Parsing produced more rows than the limit allows
    #[error("Dataset exceeds {limit} rows")]
    RowLimitExceeded { limit: usize },

    /// A line failed structural parsing (1-based line number)
    #[error("Invalid record on line {line}")]
    MalformedLine { line: usize },

    /// Unclassified internal failure
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Convenience type alias for Results with DataproofError
pub type Result<T> = std::result::Result<T, DataproofError>;

impl DataproofError {
    /// Creates a schema-not-found error.
    pub fn schema_not_found(schema_id: impl Into<String>) -> Self {
        Self::SchemaNotFound {
            schema_id: schema_id.into(),
        }
    }

    /// Creates an unsupported-format error.
    pub fn unsupported_format(schema_id: impl Into<String>, format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            schema_id: schema_id.into(),
            format: format.into(),
        }
    }

    /// Creates an internal error with context.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP-equivalent status classification for the enclosing request layer.
    ///
    /// Schema lookup misses map to 404, structural dataset defects to 400,
    /// and anything unclassified to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SchemaNotFound { .. } => 404,
            Self::UnsupportedFormat { .. }
            | Self::EmptyDataset
            | Self::DatasetTooLarge { .. }
            | Self::NoRows
            | Self::RowLimitExceeded { .. }
            | Self::MalformedLine { .. } => 400,
            Self::Internal { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(DataproofError::schema_not_found("x").status_code(), 404);
        assert_eq!(
            DataproofError::unsupported_format("x", "csv").status_code(),
            400
        );
        assert_eq!(DataproofError::EmptyDataset.status_code(), 400);
        assert_eq!(
            DataproofError::DatasetTooLarge { limit_bytes: 750_000 }.status_code(),
            400
        );
        assert_eq!(DataproofError::NoRows.status_code(), 400);
        assert_eq!(
            DataproofError::RowLimitExceeded { limit: 2_000 }.status_code(),
            400
        );
        assert_eq!(DataproofError::MalformedLine { line: 3 }.status_code(), 400);
        assert_eq!(DataproofError::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_error_messages() {
        let err = DataproofError::schema_not_found("news_comments_v1");
        assert_eq!(err.to_string(), "Schema news_comments_v1 not found");

        let err = DataproofError::MalformedLine { line: 12 };
        assert!(err.to_string().contains("line 12"));

        let err = DataproofError::unsupported_format("ai_prompts_v1", "csv");
        assert!(err.to_string().contains("does not support csv"));
    }
}
