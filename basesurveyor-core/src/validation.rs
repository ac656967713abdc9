//! JSON Schema validation for the BaseSurveyor output format.
//!
//! This module validates the structured-data export of a [`SchemaModel`]
//! using an embedded JSON Schema, then checks the model invariants that a
//! JSON Schema cannot express: sample counts bounded by record counts,
//! relationship endpoints present in the model, and statistics consistent
//! with the tables they were derived from.
//!
//! # Example
//! ```rust
//! use basesurveyor_core::models::SchemaModel;
//! use basesurveyor_core::validation::{initialize_schema_validator, validate_schema_output};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! initialize_schema_validator()?;
//! let schema = SchemaModel::new("app1", "Projects");
//! let json_value = serde_json::to_value(&schema)?;
//!
//! validate_schema_output(&json_value)?;
//! # Ok(())
//! # }
//! ```

use crate::models::{SchemaModel, StatisticsOutcome};
use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

/// JSON Schema validation errors with detailed field-level reporting
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// Validation failed with specific field errors
    #[error("Schema validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<String>,
    },

    /// Unsupported format version detected
    #[error("Unsupported format version '{version}'. Supported versions: {supported:?}")]
    UnsupportedVersion {
        version: String,
        supported: Vec<String>,
    },

    /// The document is well-formed but internally inconsistent
    #[error("Model invariant violated: {reason}")]
    InvariantViolation { reason: String },

    /// JSON parsing error
    #[error("JSON parsing failed: {source}")]
    JsonParsing {
        #[from]
        source: serde_json::Error,
    },
}

/// Supported format versions
const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Embedded JSON Schema for v1.0 format validation
const SCHEMA_V1_0: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "BaseSurveyor Schema Model Format v1.0",
  "type": "object",
  "required": [
    "formatVersion", "baseId", "baseName", "tables", "relationships",
    "statistics", "generatedAt", "generatorVersion"
  ],
  "properties": {
    "formatVersion": { "type": "string", "pattern": "^1\\.0$" },
    "baseId": { "type": "string" },
    "baseName": { "type": "string" },
    "tables": { "type": "array", "items": { "$ref": "#/$defs/table" } },
    "relationships": { "type": "array", "items": { "$ref": "#/$defs/relationship" } },
    "statistics": {
      "oneOf": [
        {
          "type": "object",
          "required": [
            "status", "totalTables", "totalFields", "totalViews", "totalRecords",
            "fieldTypeDistribution", "fieldCategoryDistribution", "tableSizes"
          ],
          "properties": {
            "status": { "const": "computed" },
            "totalTables": { "type": "integer", "minimum": 0 },
            "totalFields": { "type": "integer", "minimum": 0 },
            "totalViews": { "type": "integer", "minimum": 0 },
            "totalRecords": { "type": "integer", "minimum": 0 },
            "fieldTypeDistribution": {
              "type": "object",
              "additionalProperties": { "type": "integer", "minimum": 0 }
            },
            "fieldCategoryDistribution": {
              "type": "object",
              "propertyNames": { "$ref": "#/$defs/category" },
              "additionalProperties": { "type": "integer", "minimum": 0 }
            },
            "tableSizes": {
              "type": "array",
              "items": {
                "type": "object",
                "required": ["tableId", "tableName", "recordCount", "fieldCount"],
                "properties": {
                  "tableId": { "type": "string" },
                  "tableName": { "type": "string" },
                  "recordCount": { "type": "integer", "minimum": 0 },
                  "fieldCount": { "type": "integer", "minimum": 0 }
                }
              }
            }
          }
        },
        {
          "type": "object",
          "required": ["status", "error"],
          "properties": {
            "status": { "const": "failed" },
            "error": { "type": "string" }
          }
        },
        {
          "type": "object",
          "required": ["status"],
          "properties": { "status": { "const": "skipped" } }
        }
      ]
    },
    "warnings": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["kind"],
        "properties": {
          "kind": {
            "enum": [
              "malformedField", "malformedView", "optionExtraction",
              "recordQuery", "statisticsDerivation"
            ]
          }
        }
      },
      "default": []
    },
    "generatedAt": { "type": "string", "format": "date-time" },
    "generatorVersion": { "type": "string", "minLength": 1 }
  },
  "$defs": {
    "category": {
      "enum": [
        "TEXT", "NUMERIC", "DATE", "SELECT", "RELATIONAL",
        "ATTACHMENT", "CHECKBOX", "USER", "COMPUTED", "OTHER"
      ]
    },
    "table": {
      "type": "object",
      "required": [
        "id", "name", "primaryFieldId", "primaryFieldName",
        "fields", "views", "recordCount", "sampleRecords"
      ],
      "properties": {
        "id": { "type": "string" },
        "name": { "type": "string" },
        "description": { "type": ["string", "null"] },
        "primaryFieldId": { "type": "string" },
        "primaryFieldName": { "type": "string" },
        "fields": { "type": "array", "items": { "$ref": "#/$defs/field" } },
        "views": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["id", "name"],
            "properties": {
              "id": { "type": "string" },
              "name": { "type": "string" },
              "type": { "type": ["string", "null"] }
            }
          }
        },
        "recordCount": { "type": "integer", "minimum": 0 },
        "sampleRecords": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["id", "name"],
            "properties": {
              "id": { "type": "string" },
              "name": { "type": "string" }
            }
          }
        }
      }
    },
    "field": {
      "type": "object",
      "required": ["id", "name", "type", "category", "isComputed", "options"],
      "properties": {
        "id": { "type": "string" },
        "name": { "type": "string" },
        "type": { "type": "string" },
        "description": { "type": ["string", "null"] },
        "category": { "$ref": "#/$defs/category" },
        "isComputed": { "type": "boolean" },
        "options": {
          "type": "object",
          "required": ["kind"],
          "properties": {
            "kind": {
              "enum": [
                "empty", "select", "numeric", "date", "checkbox",
                "rating", "lookup", "rollup", "count", "formula"
              ]
            }
          }
        },
        "linkedTableId": { "type": "string" },
        "inverseLinkFieldId": { "type": "string" },
        "prefersSingleLink": { "type": "boolean" }
      }
    },
    "relationship": {
      "type": "object",
      "required": ["fromTableId", "fromFieldId", "toTableId", "kind", "prefersSingleLink"],
      "properties": {
        "fromTableId": { "type": "string" },
        "fromFieldId": { "type": "string" },
        "toTableId": { "type": "string" },
        "kind": { "const": "linkedRecord" },
        "prefersSingleLink": { "type": "boolean" }
      }
    }
  }
}"##;

/// Compiled JSON Schema instance (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Initialize and compile the JSON Schema for validation
///
/// This function compiles the embedded JSON Schema and caches it for reuse.
/// Calls after the first successful one return without recompiling.
///
/// # Errors
/// Returns `ValidationError::SchemaCompilation` if the embedded schema is invalid.
pub fn initialize_schema_validator() -> Result<(), ValidationError> {
    if COMPILED_SCHEMA.get().is_some() {
        return Ok(());
    }

    let schema_json = get_schema_definition()?;

    let compiled = jsonschema::validator_for(&schema_json).map_err(|e| {
        ValidationError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        }
    })?;

    // Already set by an earlier call
    let _ = COMPILED_SCHEMA.set(compiled);

    Ok(())
}

/// Validate a schema model JSON document
///
/// Checks, in order:
/// - format version compatibility
/// - JSON Schema structure
/// - model invariants (see [`validate_model_invariants`])
///
/// # Errors
/// Returns the first failing check.
pub fn validate_schema_output(json_value: &Value) -> Result<(), ValidationError> {
    let schema = COMPILED_SCHEMA
        .get()
        .ok_or_else(|| ValidationError::SchemaCompilation {
            message: "Schema validator not initialized. Call initialize_schema_validator() first."
                .to_string(),
        })?;

    validate_format_version(json_value)?;

    if let Err(validation_error) = schema.validate(json_value) {
        return Err(ValidationError::ValidationFailed {
            error_count: 1,
            errors: vec![format!("Schema validation failed: {}", validation_error)],
        });
    }

    let model: SchemaModel = serde_json::from_value(json_value.clone())?;
    validate_model_invariants(&model)
}

/// Validate format version compatibility
fn validate_format_version(json_value: &Value) -> Result<(), ValidationError> {
    let version = json_value
        .get("formatVersion")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ValidationError::ValidationFailed {
            error_count: 1,
            errors: vec!["Missing required field 'formatVersion'".to_string()],
        })?;

    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(ValidationError::UnsupportedVersion {
            version: version.to_string(),
            supported: SUPPORTED_VERSIONS.iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(())
}

/// Checks the invariants a finished model must hold.
///
/// - every table has at most `recordCount` sample records
/// - every relationship connects two tables of the model, starting at a
///   field of the owning table
/// - computed statistics agree with the tables: totals match and
///   `tableSizes` is sorted by record count, descending
///
/// # Errors
/// Returns `ValidationError::InvariantViolation` naming the first violation.
pub fn validate_model_invariants(model: &SchemaModel) -> Result<(), ValidationError> {
    for table in &model.tables {
        if table.sample_records.len() > table.record_count {
            return Err(violation(format!(
                "table '{}' has {} sample records but a record count of {}",
                table.id,
                table.sample_records.len(),
                table.record_count
            )));
        }
    }

    let table_ids: HashSet<&str> = model.tables.iter().map(|t| t.id.as_str()).collect();
    for edge in &model.relationships {
        if !table_ids.contains(edge.to_table_id.as_str()) {
            return Err(violation(format!(
                "relationship from '{}' targets missing table '{}'",
                edge.from_table_id, edge.to_table_id
            )));
        }
        let owner_has_field = model
            .table(&edge.from_table_id)
            .is_some_and(|t| t.field(&edge.from_field_id).is_some());
        if !owner_has_field {
            return Err(violation(format!(
                "relationship source '{}.{}' is not a field of the model",
                edge.from_table_id, edge.from_field_id
            )));
        }
    }

    if let StatisticsOutcome::Computed(stats) = &model.statistics {
        if stats.total_tables != model.tables.len() {
            return Err(violation(format!(
                "statistics count {} tables, model has {}",
                stats.total_tables,
                model.tables.len()
            )));
        }
        if stats.total_fields != model.field_count() {
            return Err(violation(format!(
                "statistics count {} fields, model has {}",
                stats.total_fields,
                model.field_count()
            )));
        }
        let sorted = stats
            .table_sizes
            .windows(2)
            .all(|pair| pair[0].record_count >= pair[1].record_count);
        if !sorted {
            return Err(violation(
                "table sizes are not sorted by record count".to_string(),
            ));
        }
    }

    Ok(())
}

fn violation(reason: String) -> ValidationError {
    ValidationError::InvariantViolation { reason }
}

/// Validate and load a [`SchemaModel`] from JSON
///
/// Combines parsing, schema validation and deserialization into a single
/// operation.
///
/// # Errors
/// Returns validation errors for malformed JSON, schema violations or
/// broken model invariants.
pub fn validate_and_parse_schema(json_str: &str) -> Result<SchemaModel, ValidationError> {
    let json_value: Value = serde_json::from_str(json_str)?;

    validate_schema_output(&json_value)?;

    let schema: SchemaModel = serde_json::from_value(json_value)?;

    Ok(schema)
}

/// Get the embedded JSON Schema as a parsed Value for external use
pub fn get_schema_definition() -> Result<Value, ValidationError> {
    serde_json::from_str(SCHEMA_V1_0).map_err(|e| ValidationError::SchemaCompilation {
        message: format!("Failed to parse embedded schema: {}", e),
    })
}
