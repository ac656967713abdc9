//! Analysis configuration.
//!
//! The configuration is resolved once, before analysis starts, and passed by
//! reference into the table walker and schema builder. Nothing mutates it
//! while a run is in progress.

use serde::{Deserialize, Serialize};

/// Upper bound for the number of sampled records per table.
pub const MAX_SAMPLE_RECORDS_LIMIT: usize = 1000;

/// Configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Number of record identities kept per table
    pub max_sample_records: usize,
    /// Whether reports show field ids next to field names
    pub include_field_ids: bool,
    /// Whether to derive the relationship graph
    pub compute_relationships: bool,
    /// Whether to derive aggregate statistics
    pub compute_statistics: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_sample_records: 5,
            include_field_ids: false,
            compute_relationships: true,
            compute_statistics: true,
        }
    }
}

impl AnalysisConfig {
    /// Creates a new analysis config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the per-table sample size.
    pub fn with_max_sample_records(mut self, max: usize) -> Self {
        if max > MAX_SAMPLE_RECORDS_LIMIT {
            tracing::warn!(
                "max_sample_records {} clamped to {}",
                max,
                MAX_SAMPLE_RECORDS_LIMIT
            );
        }
        self.max_sample_records = max.min(MAX_SAMPLE_RECORDS_LIMIT);
        self
    }

    /// Builder method to show or hide field ids in reports.
    pub fn with_field_ids(mut self, include: bool) -> Self {
        self.include_field_ids = include;
        self
    }

    /// Builder method to enable/disable relationship derivation.
    pub fn with_relationships(mut self, enabled: bool) -> Self {
        self.compute_relationships = enabled;
        self
    }

    /// Builder method to enable/disable statistics derivation.
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.compute_statistics = enabled;
        self
    }
}
