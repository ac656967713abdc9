//! Report and export tests against the shared snapshot fixture.
//!
//! This test suite covers:
//! - `analyze` views and table lookup
//! - Export files in every format
//! - Output validation of the JSON export
//! - Id visibility controlled by the analysis configuration

use basesurveyor::cli::{Cli, Command, analyze_snapshot, run_analyze};
use basesurveyor::export::{self, ExportFormat};
use basesurveyor_core::{
    AnalysisConfig, SchemaModel, initialize_schema_validator, validate_and_parse_schema,
};
use clap::Parser;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../basesurveyor-core/tests/fixtures/project_base.json")
}

async fn analyze(config: &AnalysisConfig) -> SchemaModel {
    analyze_snapshot(&fixture_path(), config).await.unwrap()
}

async fn run_cli(args: &[&str]) -> anyhow::Result<String> {
    let fixture = fixture_path();
    let mut argv = vec!["basesurveyor"];
    argv.extend_from_slice(args);
    argv.push(fixture.to_str().unwrap());
    let cli = Cli::try_parse_from(argv)?;
    let config = cli.analysis.to_config();
    let Command::Analyze(analyze_args) = &cli.command else {
        panic!("expected analyze");
    };

    let schema = analyze_snapshot(&analyze_args.input, &config).await?;
    let mut out = Vec::new();
    run_analyze(&schema, &config, analyze_args, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

#[tokio::test]
async fn test_integration_overview_view() {
    let text = run_cli(&["analyze"]).await.unwrap();

    assert!(text.starts_with("# Project Tracker"));
    assert!(text.contains("- Tables: 3"));
    assert!(text.contains("- Relationships: 2"));
    assert!(text.contains("- Warnings: 4"));
    assert!(!text.contains("appProjects000001"));
}

#[tokio::test]
async fn test_integration_relationships_view() {
    let text = run_cli(&["analyze", "--view", "relationships"]).await.unwrap();

    assert!(text.contains("- Tasks.Assignee -> People (One-to-One/Many)"));
    assert!(text.contains("- People.Tasks -> Tasks (Many-to-Many)"));
}

#[tokio::test]
async fn test_integration_relationships_disabled() {
    let text = run_cli(&["--no-relationships", "analyze", "--view", "relationships"])
        .await
        .unwrap();
    assert!(text.contains("Relationship analysis is disabled."));
}

#[tokio::test]
async fn test_integration_statistics_view() {
    let text = run_cli(&["analyze", "--view", "statistics"]).await.unwrap();

    assert!(text.contains("- Total tables: 3"));
    assert!(text.contains("- Total records: 9"));
}

#[tokio::test]
async fn test_integration_table_by_name_with_ids() {
    let text = run_cli(&["--include-field-ids", "analyze", "--table", "people"])
        .await
        .unwrap();

    assert!(text.starts_with("## People"));
    assert!(text.contains("fldTasks"));
}

#[tokio::test]
async fn test_integration_unknown_table_is_an_error() {
    let err = run_cli(&["analyze", "--table", "Nowhere"]).await.unwrap_err();
    assert!(err.to_string().contains("Nowhere"));
}

#[tokio::test]
async fn test_integration_json_export_to_stdout_is_valid() {
    initialize_schema_validator().unwrap();
    let text = run_cli(&["analyze", "--format", "json"]).await.unwrap();

    let parsed = validate_and_parse_schema(&text).unwrap();
    assert_eq!(parsed.base_id, "appProjects000001");
    assert_eq!(parsed.tables.len(), 3);
    assert_eq!(parsed.relationships.len(), 2);
}

#[tokio::test]
async fn test_file_exports_in_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::default();
    let schema = analyze(&config).await;

    for format in ExportFormat::ALL {
        let path = dir
            .path()
            .join(export::default_file_name(&schema, format, false));
        let written = export::save_export(&schema, &config, format, &path, false)
            .await
            .unwrap();
        assert_eq!(written, path);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    let markdown =
        std::fs::read_to_string(dir.path().join("project-tracker.schema.md")).unwrap();
    assert!(markdown.starts_with("# Project Tracker"));
    assert!(markdown.contains("## Milestones"));
    assert!(markdown.contains("Tasks.Assignee -> People (One-to-One/Many)"));

    let csv = std::fs::read_to_string(dir.path().join("project-tracker.schema.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("table,field,type,category,computed,primary,linked_table,cardinality")
    );
    assert_eq!(lines.count(), schema.field_count());
}

#[tokio::test]
async fn test_file_export_with_ids_adds_columns() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::default().with_field_ids(true);
    let schema = analyze(&config).await;
    let path = dir.path().join("fields.csv");

    export::save_export(&schema, &config, ExportFormat::Csv, &path, false)
        .await
        .unwrap();

    let csv = std::fs::read_to_string(&path).unwrap();
    let header = csv.lines().next().unwrap();
    assert!(header.ends_with("table_id,field_id,linked_table_id"));
    assert!(csv.contains("tblTasks,fldAssignee,tblPeople"));
}

#[cfg(not(feature = "compression"))]
#[tokio::test]
async fn test_file_compressed_export_requires_feature() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::default();
    let schema = analyze(&config).await;
    let path = dir.path().join("schema.json.zst");

    let result = export::save_export(&schema, &config, ExportFormat::Json, &path, true).await;
    assert!(result.is_err());
    assert!(!path.exists());
}
