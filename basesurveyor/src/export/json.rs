//! Structured-data export.

use basesurveyor_core::{
    Result, SchemaModel, SurveyorError, initialize_schema_validator, validate_schema_output,
};

/// Serializes the model as pretty JSON after validating it.
///
/// The document is checked against the embedded JSON Schema and the model
/// invariants before it is returned, so an invalid model is never exported.
///
/// # Errors
/// Returns an error if serialization or validation fails.
pub fn encode_json(schema: &SchemaModel) -> Result<String> {
    let value = serde_json::to_value(schema).map_err(|e| SurveyorError::Serialization {
        context: "Failed to serialize schema model".to_string(),
        source: e,
    })?;

    initialize_schema_validator().map_err(|e| {
        SurveyorError::configuration(format!("Failed to initialize schema validator: {}", e))
    })?;
    validate_schema_output(&value)
        .map_err(|e| SurveyorError::export(format!("Output validation failed: {}", e)))?;
    tracing::debug!("Output validation passed");

    serde_json::to_string_pretty(&value).map_err(|e| SurveyorError::Serialization {
        context: "Failed to encode schema model".to_string(),
        source: e,
    })
}
