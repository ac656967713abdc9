//! Tabular export: one row per field.

use basesurveyor_core::{AnalysisConfig, Result, SchemaModel, SurveyorError};

const COLUMNS: [&str; 8] = [
    "table",
    "field",
    "type",
    "category",
    "computed",
    "primary",
    "linked_table",
    "cardinality",
];
const ID_COLUMNS: [&str; 3] = ["table_id", "field_id", "linked_table_id"];

/// Encodes every field of every table as a CSV row.
///
/// Id columns are appended only when `include_field_ids` is set. Link
/// columns are empty for fields that are not resolved links.
///
/// # Errors
/// Returns an export error if the CSV writer fails.
pub fn encode_csv(schema: &SchemaModel, config: &AnalysisConfig) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = COLUMNS.to_vec();
    if config.include_field_ids {
        header.extend(ID_COLUMNS);
    }
    writer.write_record(&header).map_err(csv_error)?;

    for table in &schema.tables {
        for field in &table.fields {
            let linked = field.linked_table_id.as_deref().filter(|_| field.is_resolved_link());
            let cardinality = match (linked, field.prefers_single_link) {
                (Some(_), Some(true)) => "One-to-One/Many",
                (Some(_), _) => "Many-to-Many",
                (None, _) => "",
            };

            let mut row = vec![
                table.name.clone(),
                field.name.clone(),
                field.field_type.clone(),
                field.category.to_string(),
                field.is_computed.to_string(),
                (field.id == table.primary_field_id).to_string(),
                linked.map_or_else(String::new, |id| schema.table_name(id).to_string()),
                cardinality.to_string(),
            ];
            if config.include_field_ids {
                row.push(table.id.clone());
                row.push(field.id.clone());
                row.push(linked.unwrap_or_default().to_string());
            }
            writer.write_record(&row).map_err(csv_error)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SurveyorError::export(format!("Failed to flush CSV export: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| SurveyorError::export(format!("CSV export is not valid UTF-8: {}", e)))
}

fn csv_error(e: csv::Error) -> SurveyorError {
    SurveyorError::export(format!("Failed to write CSV record: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use basesurveyor_core::fields::categorize;
    use basesurveyor_core::models::{FieldModel, FieldOptions, TableModel};
    use basesurveyor_core::{NoopProgress, SchemaBuilder, SnapshotBase};
    use std::sync::Arc;

    fn field(id: &str, name: &str, field_type: &str) -> FieldModel {
        FieldModel {
            id: id.to_string(),
            name: name.to_string(),
            field_type: field_type.to_string(),
            description: None,
            category: categorize(field_type),
            is_computed: false,
            options: FieldOptions::Empty,
            linked_table_id: None,
            inverse_link_field_id: None,
            prefers_single_link: None,
        }
    }

    fn schema() -> SchemaModel {
        let mut tasks = TableModel::new("tbl1", "Tasks");
        tasks.primary_field_id = "fld1".to_string();
        tasks.primary_field_name = "Name".to_string();
        let mut owner = field("fld2", "Owner, primary", "multipleRecordLinks");
        owner.linked_table_id = Some("tbl2".to_string());
        owner.prefers_single_link = Some(true);
        tasks.fields = vec![field("fld1", "Name", "singleLineText"), owner];

        let mut people = TableModel::new("tbl2", "People");
        people.fields = vec![field("fld3", "Email", "email")];

        let mut schema = SchemaModel::new("app1", "Projects");
        schema.tables = vec![tasks, people];
        schema
    }

    #[test]
    fn test_export_csv_rows_without_ids() {
        let csv = encode_csv(&schema(), &AnalysisConfig::default()).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "table,field,type,category,computed,primary,linked_table,cardinality"
        );
        assert_eq!(lines[1], "Tasks,Name,singleLineText,TEXT,false,true,,");
        assert_eq!(
            lines[2],
            "Tasks,\"Owner, primary\",multipleRecordLinks,RELATIONAL,false,false,People,One-to-One/Many"
        );
        assert_eq!(lines.len(), 4);
        assert!(!csv.contains("fld1"));
    }

    #[test]
    fn test_export_csv_rows_with_ids() {
        let config = AnalysisConfig::default().with_field_ids(true);
        let csv = encode_csv(&schema(), &config).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert!(lines[0].ends_with(",table_id,field_id,linked_table_id"));
        assert!(lines[2].ends_with(",tbl1,fld2,tbl2"));
        assert!(lines[3].ends_with(",tbl2,fld3,"));
    }

    #[tokio::test]
    async fn test_export_csv_skipped_primary_marks_no_field() {
        let base = SnapshotBase::from_json_str(
            r#"{
                "id": "app1",
                "name": "Projects",
                "tables": [{
                    "id": "tbl1",
                    "name": "Tasks",
                    "fields": [
                        {"id": "fldPrim", "name": "Name"},
                        {"id": "fldB", "name": "Estimate", "type": "number"}
                    ]
                }]
            }"#,
        )
        .unwrap();
        let config = AnalysisConfig::default();
        let schema = SchemaBuilder::new(config.clone())
            .with_observer(Arc::new(NoopProgress))
            .build(&base)
            .await
            .unwrap();
        assert_eq!(schema.tables[0].primary_field_id, "fldPrim");

        let csv = encode_csv(&schema, &config).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Tasks,Estimate,number,NUMERIC,false,false,,");
    }
}
