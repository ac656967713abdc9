//! Error types for schema introspection.
//!
//! Two families live here. [`SurveyorError`] is the crate-level error that
//! surfaces to callers; during analysis only [`SurveyorError::FatalAnalysis`]
//! ever escapes the schema builder. [`AnalysisIssue`] describes failures that
//! are contained to a single field, view, record query or statistics pass.
//! Those never abort a run and are reported alongside the finished model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for BaseSurveyor operations.
#[derive(Debug, Error)]
pub enum SurveyorError {
    /// The data source could not be read
    #[error("Data source access failed: {context}")]
    Source {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Analysis aborted outside every per-item guard
    #[error("Fatal analysis error: {context}")]
    FatalAnalysis { context: String },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Rendering a report or export failed
    #[error("Export failed: {context}")]
    Export { context: String },
}

/// Convenience type alias for Results with SurveyorError
pub type Result<T> = std::result::Result<T, SurveyorError>;

impl SurveyorError {
    /// Creates a data-source error from a plain message.
    ///
    /// Useful for sources whose failures are not backed by a typed error.
    pub fn source_message(context: impl Into<String>) -> Self {
        let context = context.into();
        Self::Source {
            source: context.clone().into(),
            context,
        }
    }

    /// Creates a fatal analysis error
    pub fn fatal(context: impl Into<String>) -> Self {
        Self::FatalAnalysis {
            context: context.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an export error
    pub fn export(context: impl Into<String>) -> Self {
        Self::Export {
            context: context.into(),
        }
    }

    /// Returns true when this error must halt a run before any report.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalAnalysis { .. })
    }
}

/// A failure contained to the smallest possible scope.
///
/// The affected item is omitted, zeroed or emptied and analysis continues
/// with its siblings. Issues are kept in the order they were encountered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AnalysisIssue {
    /// A field lacked one of `id`, `name` or `type`; the field was skipped
    #[error("Malformed field #{position} in table '{table_id}': missing {missing}")]
    MalformedField {
        table_id: String,
        position: usize,
        missing: String,
    },

    /// A view lacked `id` or `name`; the view was skipped
    #[error("Malformed view #{position} in table '{table_id}': missing {missing}")]
    MalformedView {
        table_id: String,
        position: usize,
        missing: String,
    },

    /// Field options could not be normalized; the field kept empty options
    #[error(
        "Option extraction failed for field '{field_id}' ({field_type}) in table '{table_id}': {reason}"
    )]
    OptionExtraction {
        table_id: String,
        field_id: String,
        field_type: String,
        reason: String,
    },

    /// The bounded record query failed; record count and samples stay empty
    #[error("Record query failed for table '{table_id}': {reason}")]
    RecordQuery { table_id: String, reason: String },

    /// The statistics pass failed as a whole
    #[error("Statistics derivation failed: {reason}")]
    StatisticsDerivation { reason: String },
}

impl AnalysisIssue {
    /// Table the issue belongs to, if it is table-scoped.
    pub fn table_id(&self) -> Option<&str> {
        match self {
            Self::MalformedField { table_id, .. }
            | Self::MalformedView { table_id, .. }
            | Self::OptionExtraction { table_id, .. }
            | Self::RecordQuery { table_id, .. } => Some(table_id),
            Self::StatisticsDerivation { .. } => None,
        }
    }
}
