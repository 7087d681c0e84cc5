//! Declarative dataset validation with deterministic quality scoring.
//!
//! dataproof validates a submitted tabular or line-delimited dataset
//! against a declarative schema and produces a deterministic quality
//! report: a 0-100 score, aggregate metrics, a capped issue list, an
//! itemized penalty breakdown, and remediation advice. It is the core
//! publishers run before any external storage or ledger step.
//!
//! # Architecture
//! The pipeline is strictly linear per invocation: registry lookup,
//! parse, a single combined per-row pass (field validation + duplicate
//! tracking + privacy scanning), threshold checks, scoring, report
//! assembly. The core performs no I/O; the only shared state is the
//! read-only schema registry, so invocations can run concurrently
//! without synchronization.
//!
//! # Example
//! ```
//! use dataproof::{DatasetFormat, SchemaRegistry, ValidationEngine, ValidationInput};
//!
//! let engine = ValidationEngine::new(SchemaRegistry::builtin());
//! let outcome = engine.run(ValidationInput {
//!     dataset_name: "comments-2024-06".to_string(),
//!     schema_id: "news_comments_v1".to_string(),
//!     format: DatasetFormat::Jsonl,
//!     content: r#"{"record_id": "c1", "user_handle": "user_87a3", "comment": "great read", "created_at": "2024-05-21T09:10:34Z"}"#.to_string(),
//!     external_ref: None,
//! })?;
//!
//! println!("score {} passed {}", outcome.report.score, outcome.report.passed);
//! # Ok::<(), dataproof::DataproofError>(())
//! ```

pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod quality;
pub mod registry;

// Re-export commonly used types
pub use engine::{EngineConfig, ValidationEngine, ValidationInput, ValidationOutcome};
pub use error::{DataproofError, Result};
pub use models::{
    DatasetFormat, FieldStat, FieldType, Issue, IssueLevel, Row, SchemaDefinition, SchemaField,
    ScoreBreakdown, ValidationMetrics, ValidationReport, MAX_ISSUES,
};
pub use registry::SchemaRegistry;
