//! End-to-end pipeline tests against a JSON snapshot fixture.
//!
//! This test suite covers:
//! - Field categorization and option normalization through the walker
//! - Contained failures (malformed field/view, bad options, failed record query)
//! - Relationship derivation with an unanalyzed link target
//! - Statistics derivation
//! - Idempotence across runs
//! - Validation of the serialized model

use basesurveyor_core::{
    AnalysisConfig, AnalysisIssue, FieldCategory, FieldOptions, NoopProgress, Result,
    SchemaBuilder, SchemaModel, SnapshotBase, initialize_schema_validator,
    validate_and_parse_schema,
};
use std::path::PathBuf;
use std::sync::Arc;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project_base.json")
}

async fn analyze(config: AnalysisConfig) -> Result<SchemaModel> {
    let base = SnapshotBase::load(&fixture_path()).await?;
    SchemaBuilder::new(config)
        .with_observer(Arc::new(NoopProgress))
        .build(&base)
        .await
}

// =============================================================================
// Table walking
// =============================================================================

#[tokio::test]
async fn test_snapshot_tables_in_source_order() -> Result<()> {
    let schema = analyze(AnalysisConfig::default()).await?;

    assert_eq!(schema.base_id, "appProjects000001");
    assert_eq!(schema.base_name, "Project Tracker");
    let names: Vec<_> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Tasks", "People", "Milestones"]);
    Ok(())
}

#[tokio::test]
async fn test_snapshot_malformed_field_excluded_without_side_effects() -> Result<()> {
    let schema = analyze(AnalysisConfig::default()).await?;
    let tasks = &schema.tables[0];

    let ids: Vec<_> = tasks.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "fldTaskName",
            "fldStatus",
            "fldAssignee",
            "fldArchive",
            "fldEstimate",
            "fldDue",
            "fldScore",
            "fldDone"
        ]
    );
    assert_eq!(tasks.primary_field_id, "fldTaskName");
    assert_eq!(tasks.primary_field_name, "Name");
    assert_eq!(tasks.description.as_deref(), Some("Work items"));
    Ok(())
}

#[tokio::test]
async fn test_snapshot_option_normalization() -> Result<()> {
    let schema = analyze(AnalysisConfig::default()).await?;
    let tasks = &schema.tables[0];

    let status = tasks.field("fldStatus").expect("status field");
    assert_eq!(status.category, FieldCategory::Select);
    let FieldOptions::Select { choices } = &status.options else {
        panic!("expected select options, got {:?}", status.options);
    };
    assert_eq!(choices.len(), 2);
    assert_eq!(choices[1].color, "default");

    let score = tasks.field("fldScore").expect("score field");
    assert_eq!(score.options, FieldOptions::Empty);

    let done = tasks.field("fldDone").expect("checkbox field");
    assert_eq!(
        done.options,
        FieldOptions::Checkbox {
            icon: Some("check".to_string()),
            color: Some("greenBright".to_string()),
        }
    );

    let count = schema.tables[1].field("fldTaskCount").expect("count field");
    assert!(count.is_computed);
    assert_eq!(count.category, FieldCategory::Relational);
    Ok(())
}

#[tokio::test]
async fn test_snapshot_sampling_and_record_failures() -> Result<()> {
    let schema = analyze(AnalysisConfig::default()).await?;

    let tasks = &schema.tables[0];
    assert_eq!(tasks.record_count, 7);
    assert_eq!(tasks.sample_records.len(), 5);
    assert_eq!(tasks.sample_records[2].name, "Record 3");

    let people = &schema.tables[1];
    assert_eq!(people.record_count, 2);
    assert_eq!(people.sample_records.len(), 2);

    let milestones = &schema.tables[2];
    assert_eq!(milestones.record_count, 0);
    assert!(milestones.sample_records.is_empty());
    assert_eq!(milestones.fields.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_snapshot_warnings_in_encounter_order() -> Result<()> {
    let schema = analyze(AnalysisConfig::default()).await?;

    assert_eq!(schema.warnings.len(), 4);
    assert_eq!(
        schema.warnings[0],
        AnalysisIssue::MalformedField {
            table_id: "tblTasks".to_string(),
            position: 6,
            missing: "type".to_string(),
        }
    );
    assert!(matches!(
        &schema.warnings[1],
        AnalysisIssue::OptionExtraction { field_id, .. } if field_id == "fldScore"
    ));
    assert!(matches!(
        &schema.warnings[2],
        AnalysisIssue::MalformedView { position: 2, .. }
    ));
    assert!(matches!(
        &schema.warnings[3],
        AnalysisIssue::RecordQuery { table_id, .. } if table_id == "tblMilestones"
    ));
    Ok(())
}

// =============================================================================
// Derivations
// =============================================================================

#[tokio::test]
async fn test_snapshot_relationships() -> Result<()> {
    let schema = analyze(AnalysisConfig::default()).await?;

    let edges: Vec<_> = schema
        .relationships
        .iter()
        .map(|e| {
            (
                e.from_table_id.as_str(),
                e.from_field_id.as_str(),
                e.to_table_id.as_str(),
                e.cardinality(),
            )
        })
        .collect();
    assert_eq!(
        edges,
        vec![
            ("tblTasks", "fldAssignee", "tblPeople", "One-to-One/Many"),
            ("tblPeople", "fldTasks", "tblTasks", "Many-to-Many"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_snapshot_statistics() -> Result<()> {
    let schema = analyze(AnalysisConfig::default()).await?;
    let stats = schema.statistics.aggregate().expect("statistics computed");

    assert_eq!(stats.total_tables, 3);
    assert_eq!(stats.total_fields, 14);
    assert_eq!(stats.total_views, 3);
    assert_eq!(stats.total_records, 9);
    assert_eq!(stats.field_type_distribution["singleLineText"], 3);
    assert_eq!(stats.field_type_distribution["multipleRecordLinks"], 3);
    assert_eq!(
        stats.field_category_distribution[&FieldCategory::Relational],
        4
    );

    let sizes: Vec<_> = stats
        .table_sizes
        .iter()
        .map(|s| (s.table_id.as_str(), s.record_count))
        .collect();
    assert_eq!(
        sizes,
        vec![("tblTasks", 7), ("tblPeople", 2), ("tblMilestones", 0)]
    );
    Ok(())
}

#[tokio::test]
async fn test_snapshot_sample_limit_from_config() -> Result<()> {
    let schema = analyze(AnalysisConfig::default().with_max_sample_records(1)).await?;
    assert!(schema.tables.iter().all(|t| t.sample_records.len() <= 1));

    let schema = analyze(AnalysisConfig::default().with_max_sample_records(0)).await?;
    assert!(schema.tables.iter().all(|t| t.sample_records.is_empty()));
    assert_eq!(schema.tables[0].record_count, 7);
    Ok(())
}

// =============================================================================
// Idempotence and output validation
// =============================================================================

#[tokio::test]
async fn test_snapshot_idempotent_except_timestamp() -> Result<()> {
    let first = analyze(AnalysisConfig::default()).await?;
    let mut second = analyze(AnalysisConfig::default()).await?;

    second.generated_at = first.generated_at;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_snapshot_output_validates() -> Result<()> {
    initialize_schema_validator().expect("embedded schema compiles");
    let schema = analyze(AnalysisConfig::default()).await?;

    let json = serde_json::to_string_pretty(&schema).expect("model serializes");
    let parsed = validate_and_parse_schema(&json).expect("output validates");
    assert_eq!(parsed, schema);
    Ok(())
}
