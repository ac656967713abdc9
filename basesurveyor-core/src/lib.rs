//! Core data structures and the schema introspection pipeline for BaseSurveyor.
//!
//! This crate walks a multi-table base (tables, fields, views and link
//! fields), normalizes heterogeneous field options into a uniform model,
//! derives the relationship graph and aggregate statistics, and hands the
//! frozen result to a report sink.
//!
//! # Guarantees
//! - Sources are only ever read; no operation can mutate a base
//! - Per-field, per-view and per-table failures never abort a run
//! - Output ordering is deterministic for an unchanged source
//!
//! # Architecture
//! - `source`: read-only data-source traits and a JSON snapshot source
//! - `fields`: field categorization and option normalization
//! - `analysis`: table walker, schema builder and derivations
//! - `sink`: consumer contract for finished models

pub mod analysis;
pub mod config;
pub mod error;
pub mod fields;
pub mod logging;
pub mod models;
pub mod sink;
pub mod source;
pub mod validation;

// Re-export commonly used types
pub use analysis::{
    LogProgress, NoopProgress, ProgressObserver, SchemaBuilder, TableWalk, TableWalker,
};
pub use config::{AnalysisConfig, MAX_SAMPLE_RECORDS_LIMIT};
pub use error::{AnalysisIssue, Result, SurveyorError};
pub use models::{
    FieldCategory, FieldModel, FieldOptions, RelationshipEdge, SchemaModel, StatisticsAggregate,
    StatisticsOutcome, TableModel,
};
pub use sink::ReportSink;
pub use source::{BaseSource, SnapshotBase, TableSource};

pub use validation::{
    ValidationError, initialize_schema_validator, validate_and_parse_schema,
    validate_model_invariants, validate_schema_output,
};
