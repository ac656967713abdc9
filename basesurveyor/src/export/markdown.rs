//! Human-readable document export.

use crate::report::render;
use askama::Template;
use basesurveyor_core::{AnalysisConfig, Result, SchemaModel, StatisticsOutcome, SurveyorError};

/// Template context for the Markdown document.
///
/// Everything is flattened to display strings up front so the template
/// stays free of logic.
#[derive(Template)]
#[template(path = "schema.md", escape = "none")]
struct SchemaDocument {
    base_name: String,
    base_id: String,
    generated_at: String,
    generator_version: String,
    summary: Vec<String>,
    tables: Vec<TableSection>,
    relationships: Vec<String>,
    statistics: Vec<String>,
    warnings: Vec<String>,
}

struct TableSection {
    name: String,
    description: String,
    facts: Vec<String>,
    field_rows: Vec<String>,
    views: Vec<String>,
    samples: Vec<String>,
}

/// Renders the model as a Markdown document.
///
/// # Errors
/// Returns an export error if template rendering fails.
pub fn encode_markdown(schema: &SchemaModel, config: &AnalysisConfig) -> Result<String> {
    let document = SchemaDocument {
        base_name: schema.base_name.clone(),
        base_id: schema.base_id.clone(),
        generated_at: schema.generated_at.to_rfc3339(),
        generator_version: schema.generator_version.clone(),
        summary: vec![
            format!("Tables: {}", schema.tables.len()),
            format!("Fields: {}", schema.field_count()),
            format!("Views: {}", schema.view_count()),
            format!("Relationships: {}", schema.relationships.len()),
        ],
        tables: schema
            .tables
            .iter()
            .map(|table| TableSection {
                name: table.name.clone(),
                description: table.description.clone().unwrap_or_default(),
                facts: render::table_facts(table, config),
                field_rows: render::field_table(schema, table, config),
                views: table.views.iter().map(render::view_line).collect(),
                samples: table
                    .sample_records
                    .iter()
                    .map(|r| r.name.clone())
                    .collect(),
            })
            .collect(),
        relationships: schema
            .relationships
            .iter()
            .map(|edge| render::relationship_line(schema, edge, config))
            .collect(),
        statistics: match &schema.statistics {
            StatisticsOutcome::Computed(stats) => render::statistics_lines(stats),
            StatisticsOutcome::Failed { error } => {
                vec![format!("Statistics unavailable: {}", error)]
            }
            StatisticsOutcome::Skipped => Vec::new(),
        },
        warnings: schema.warnings.iter().map(ToString::to_string).collect(),
    };

    document
        .render()
        .map_err(|e| SurveyorError::export(format!("Failed to render Markdown document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use basesurveyor_core::AnalysisIssue;
    use basesurveyor_core::models::{SampleRecord, TableModel};

    fn schema() -> SchemaModel {
        let mut table = TableModel::new("tbl1", "Tasks");
        table.description = Some("Work items".to_string());
        table.record_count = 1;
        table.sample_records.push(SampleRecord {
            id: "rec1".to_string(),
            name: "Write docs".to_string(),
        });
        let mut schema = SchemaModel::new("app1", "Projects");
        schema.tables.push(table);
        schema.add_warning(AnalysisIssue::RecordQuery {
            table_id: "tbl2".to_string(),
            reason: "timeout".to_string(),
        });
        schema
    }

    #[test]
    fn test_template_renders_sections() {
        let document = encode_markdown(&schema(), &AnalysisConfig::default()).unwrap();

        assert!(document.starts_with("# Projects"));
        assert!(document.contains("## Tasks"));
        assert!(document.contains("Work items"));
        assert!(document.contains("- Write docs"));
        assert!(document.contains("Record query failed for table 'tbl2': timeout"));
        assert!(!document.contains("## Statistics"));
    }

    #[test]
    fn test_template_renders_statistics_failure() {
        let mut schema = schema();
        schema.statistics = StatisticsOutcome::Failed {
            error: "record total overflowed".to_string(),
        };

        let document = encode_markdown(&schema, &AnalysisConfig::default()).unwrap();
        assert!(document.contains("## Statistics"));
        assert!(document.contains("Statistics unavailable: record total overflowed"));
    }
}
