//! Schema builder facade.
//!
//! Orchestrates a full analysis run: walks every table of a base in order,
//! then derives the relationship graph and the statistics aggregate from the
//! resulting table models.

use super::progress::{LogProgress, ProgressObserver};
use super::relationships::derive_relationships;
use super::statistics::derive_statistics;
use super::walker::TableWalker;
use crate::config::AnalysisConfig;
use crate::error::SurveyorError;
use crate::models::{SchemaModel, StatisticsOutcome};
use crate::source::BaseSource;
use crate::Result;
use std::sync::Arc;

/// Builds a [`SchemaModel`] from a [`BaseSource`].
///
/// # Example
///
/// ```rust,no_run
/// use basesurveyor_core::{AnalysisConfig, SchemaBuilder, SnapshotBase};
///
/// # async fn example() -> basesurveyor_core::Result<()> {
/// let base = SnapshotBase::load(std::path::Path::new("base.json")).await?;
/// let config = AnalysisConfig::default().with_max_sample_records(10);
/// let schema = SchemaBuilder::new(config).build(&base).await?;
/// println!("{} tables, {} links", schema.tables.len(), schema.relationships.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SchemaBuilder {
    config: AnalysisConfig,
    observer: Arc<dyn ProgressObserver>,
}

impl std::fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SchemaBuilder {
    /// Creates a builder that reports progress through logging.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            observer: Arc::new(LogProgress),
        }
    }

    /// Replaces the progress observer.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns a reference to the analysis configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes the whole base.
    ///
    /// Tables are walked one at a time in source order. Per-field, per-view
    /// and per-table failures are recorded in [`SchemaModel::warnings`]; a
    /// statistics failure becomes [`StatisticsOutcome::Failed`].
    ///
    /// # Errors
    /// Returns [`SurveyorError::FatalAnalysis`] if the table list cannot be
    /// read or the base has no tables. No partial model is returned.
    pub async fn build(&self, base: &dyn BaseSource) -> Result<SchemaModel> {
        let tables = base.tables().await.map_err(|e| {
            SurveyorError::fatal(format!("Failed to list tables of base '{}': {}", base.id(), e))
        })?;

        if tables.is_empty() {
            return Err(SurveyorError::fatal(format!(
                "Base '{}' has no tables",
                base.id()
            )));
        }

        let mut schema = SchemaModel::new(base.id(), base.name());
        let walker = TableWalker::new(&self.config);
        let total = tables.len();

        for (index, table) in tables.into_iter().enumerate() {
            self.observer.table_started(index, total, table.name());
            let walk = walker.walk(table).await;
            for issue in walk.issues {
                schema.add_warning(issue);
            }
            schema.tables.push(walk.table);
        }
        self.observer.tables_finished(total);

        if self.config.compute_relationships {
            schema.relationships = derive_relationships(&schema.tables);
            tracing::debug!("Derived {} relationships", schema.relationships.len());
        }

        if self.config.compute_statistics {
            schema.statistics = match derive_statistics(&schema.tables) {
                Ok(aggregate) => StatisticsOutcome::Computed(aggregate),
                Err(issue) => {
                    tracing::warn!("Statistics unavailable: {}", issue);
                    let error = issue.to_string();
                    schema.add_warning(issue);
                    StatisticsOutcome::Failed { error }
                }
            };
        }

        if !schema.warnings.is_empty() {
            tracing::warn!(
                "Analysis of base '{}' completed with {} warnings",
                schema.base_id,
                schema.warnings.len()
            );
        }

        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisIssue;
    use crate::source::SnapshotBase;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        started: Mutex<Vec<(usize, usize, String)>>,
    }

    impl ProgressObserver for Recorder {
        fn table_started(&self, index: usize, total: usize, table_name: &str) {
            self.started
                .lock()
                .unwrap()
                .push((index, total, table_name.to_string()));
        }
    }

    fn base() -> SnapshotBase {
        SnapshotBase::from_json_str(
            r#"{
                "id": "app1",
                "name": "Projects",
                "tables": [
                    {
                        "id": "tbl1",
                        "name": "Tasks",
                        "fields": [
                            {"id": "fld1", "name": "Name", "type": "singleLineText"},
                            {"id": "fld2", "name": "Owner", "type": "multipleRecordLinks",
                             "options": {"linkedTableId": "tbl2"}}
                        ],
                        "records": [{"id": "rec1"}]
                    },
                    {
                        "id": "tbl2",
                        "name": "People",
                        "fields": [{"id": "fld3", "name": "Name", "type": "singleLineText"}],
                        "records": "offline"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_reports_progress_in_order() {
        let recorder = Arc::new(Recorder::default());
        let builder = SchemaBuilder::new(AnalysisConfig::default()).with_observer(recorder.clone());

        builder.build(&base()).await.unwrap();

        let started = recorder.started.lock().unwrap();
        assert_eq!(
            *started,
            vec![
                (0, 2, "Tasks".to_string()),
                (1, 2, "People".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_build_contains_record_query_failure() {
        let schema = SchemaBuilder::new(AnalysisConfig::default())
            .build(&base())
            .await
            .unwrap();

        assert_eq!(schema.tables.len(), 2);
        assert_eq!(schema.tables[1].record_count, 0);
        assert!(schema.tables[1].sample_records.is_empty());
        assert!(matches!(
            schema.warnings.as_slice(),
            [AnalysisIssue::RecordQuery { table_id, .. }] if table_id == "tbl2"
        ));
        assert_eq!(schema.relationships.len(), 1);
        assert!(schema.statistics.aggregate().is_some());
    }

    #[tokio::test]
    async fn test_build_respects_disabled_derivations() {
        let config = AnalysisConfig::default()
            .with_relationships(false)
            .with_statistics(false);
        let schema = SchemaBuilder::new(config).build(&base()).await.unwrap();

        assert!(schema.relationships.is_empty());
        assert_eq!(schema.statistics, StatisticsOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_build_without_tables_is_fatal() {
        let empty = SnapshotBase::from_json_str(r#"{"id": "app1", "name": "Empty"}"#).unwrap();
        let err = SchemaBuilder::new(AnalysisConfig::default())
            .build(&empty)
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(err.to_string().contains("has no tables"));
    }
}
