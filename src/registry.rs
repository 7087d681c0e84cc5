//! Read-only schema registry.
//!
//! The registry maps schema ids to immutable [`SchemaDefinition`] values.
//! It is populated once at process start and never mutated afterwards, so
//! it can be shared freely across concurrent validation runs without
//! synchronization.

use crate::models::{DatasetFormat, FieldType, SchemaDefinition, SchemaField};

/// Immutable lookup from schema id to schema definition.
///
/// Definitions keep their insertion order, which [`list`](Self::list)
/// preserves.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<SchemaDefinition>,
}

impl SchemaRegistry {
    /// Creates a registry from the given definitions.
    ///
    /// Duplicate ids are rejected by keeping the first definition; later
    /// ones are dropped with a diagnostic.
    pub fn new(definitions: Vec<SchemaDefinition>) -> Self {
        let mut schemas: Vec<SchemaDefinition> = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if schemas.iter().any(|s| s.id == definition.id) {
                tracing::warn!(
                    "Dropping duplicate schema definition for id '{}'",
                    definition.id
                );
                continue;
            }
            schemas.push(definition);
        }
        Self { schemas }
    }

    /// Creates a registry with the built-in schema definitions.
    pub fn builtin() -> Self {
        Self::new(vec![news_comments_v1(), ai_prompts_v1()])
    }

    /// Looks up a schema definition by id.
    pub fn get(&self, schema_id: &str) -> Option<&SchemaDefinition> {
        self.schemas.iter().find(|s| s.id == schema_id)
    }

    /// Returns all registered definitions in insertion order.
    pub fn list(&self) -> &[SchemaDefinition] {
        &self.schemas
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

const BASE_FORMATS: [DatasetFormat; 2] = [DatasetFormat::Csv, DatasetFormat::Jsonl];

/// Structured comments dataset with sentiment and privacy flags.
fn news_comments_v1() -> SchemaDefinition {
    SchemaDefinition {
        id: "news_comments_v1".to_string(),
        title: "News Comments v1".to_string(),
        description: "Structured comments dataset with sentiment and privacy flags.".to_string(),
        format: BASE_FORMATS.to_vec(),
        min_rows: Some(25),
        recommended_rows: Some(200),
        duplicate_keys: Some(vec!["record_id".to_string()]),
        fields: vec![
            SchemaField::new("record_id", FieldType::String)
                .required()
                .with_description("Deterministic id per comment")
                .with_example("comment_98421")
                .with_max_missing_rate(0.0),
            SchemaField::new("user_handle", FieldType::String)
                .required()
                .with_description("Hashed or masked handle")
                .with_example("user_87a3")
                .with_max_missing_rate(0.05),
            SchemaField::new("comment", FieldType::String)
                .required()
                .with_description("Raw comment text")
                .with_example("AI moderation is the future")
                .with_max_missing_rate(0.02),
            SchemaField::new("language", FieldType::String)
                .with_description("BCP-47 language tag")
                .with_example("en"),
            SchemaField::new("sentiment_score", FieldType::Number)
                .with_description("Range -1 ... 1")
                .with_example("0.82")
                .with_max_invalid_rate(0.05),
            SchemaField::new("created_at", FieldType::Timestamp)
                .required()
                .with_description("ISO8601 timestamp")
                .with_example("2024-05-21T09:10:34.000Z")
                .with_max_missing_rate(0.02),
            SchemaField::new("contains_pii", FieldType::Boolean)
                .with_description("Uploader provided privacy flag"),
        ],
    }
}

/// Text prompts dataset with taxonomy and toxicity scoring.
fn ai_prompts_v1() -> SchemaDefinition {
    SchemaDefinition {
        id: "ai_prompts_v1".to_string(),
        title: "AI Prompts v1".to_string(),
        description: "Text prompts dataset with taxonomy + toxicity scoring.".to_string(),
        format: BASE_FORMATS.to_vec(),
        min_rows: Some(10),
        recommended_rows: Some(100),
        duplicate_keys: Some(vec!["prompt_id".to_string(), "prompt_text".to_string()]),
        fields: vec![
            SchemaField::new("prompt_id", FieldType::String)
                .required()
                .with_description("Stable id for prompt variant")
                .with_example("prompt_001"),
            SchemaField::new("prompt_text", FieldType::String)
                .required()
                .with_description("Full prompt body")
                .with_example("Summarise the news article..."),
            SchemaField::new("category", FieldType::String)
                .with_description("High-level taxonomy label")
                .with_example("news"),
            SchemaField::new("toxicity_score", FieldType::Number)
                .with_description("0-1 probability from classifier")
                .with_example("0.12")
                .with_max_invalid_rate(0.05),
            SchemaField::new("source", FieldType::String)
                .with_description("Originating dataset or user")
                .with_example("community"),
            SchemaField::new("last_used_at", FieldType::Timestamp)
                .with_description("Last validation run timestamp")
                .with_example("2024-06-01T12:00:00.000Z"),
        ],
    }
}
