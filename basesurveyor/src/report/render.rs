//! Markdown-flavoured text renderers for each report view.
//!
//! Renderers are pure functions of the frozen model and the analysis
//! configuration. Field ids appear only when `include_field_ids` is set.

use basesurveyor_core::models::{
    FieldModel, FieldOptions, RelationshipEdge, StatisticsAggregate, StatisticsOutcome,
    TableModel, ViewModel,
};
use basesurveyor_core::{AnalysisConfig, FieldCategory, SchemaModel};

/// Select choices listed before the remainder is summarized
pub const MAX_CHOICES_SHOWN: usize = 10;

/// Character limit of the full schema view
pub const FULL_SCHEMA_LIMIT: usize = 50_000;

const TRUNCATION_NOTICE: &str =
    "_Output truncated. Export the schema to see the complete listing._";

/// Base summary with the table list.
pub fn overview(schema: &SchemaModel, config: &AnalysisConfig) -> String {
    let mut lines = vec![format!("# {}", schema.base_name), String::new()];
    if config.include_field_ids {
        lines.push(format!("- Base ID: `{}`", schema.base_id));
    }
    lines.push(format!("- Tables: {}", schema.tables.len()));
    lines.push(format!("- Fields: {}", schema.field_count()));
    lines.push(format!("- Views: {}", schema.view_count()));
    lines.push(format!("- Relationships: {}", schema.relationships.len()));
    if !schema.warnings.is_empty() {
        lines.push(format!("- Warnings: {}", schema.warnings.len()));
    }

    lines.extend([String::new(), "## Tables".to_string(), String::new()]);
    lines.extend(schema.tables.iter().map(|table| {
        format!(
            "- **{}**: {} fields, {} records",
            table.name,
            table.fields.len(),
            table.record_count
        )
    }));
    to_text(lines)
}

/// Detail view of one table.
pub fn table_detail(schema: &SchemaModel, table: &TableModel, config: &AnalysisConfig) -> String {
    let mut lines = vec![format!("## {}", table.name), String::new()];
    if let Some(description) = &table.description {
        lines.extend([description.clone(), String::new()]);
    }
    lines.extend(
        table_facts(table, config)
            .into_iter()
            .map(|fact| format!("- {}", fact)),
    );

    if !table.fields.is_empty() {
        lines.extend([String::new(), "### Fields".to_string(), String::new()]);
        lines.extend(field_table(schema, table, config));
    }

    if !table.views.is_empty() {
        lines.extend([String::new(), "### Views".to_string(), String::new()]);
        lines.extend(
            table
                .views
                .iter()
                .map(|view| format!("- {}", view_line(view))),
        );
    }

    if !table.sample_records.is_empty() {
        lines.extend([String::new(), "### Sample Records".to_string(), String::new()]);
        lines.extend(table.sample_records.iter().map(|record| {
            if config.include_field_ids {
                format!("- {} (`{}`)", record.name, record.id)
            } else {
                format!("- {}", record.name)
            }
        }));
    }

    let warnings = table_warnings(schema, table);
    if !warnings.is_empty() {
        lines.extend([String::new(), "### Warnings".to_string(), String::new()]);
        lines.extend(warnings.into_iter().map(|warning| format!("- {}", warning)));
    }
    to_text(lines)
}

/// Contained failures recorded against one table, in encounter order.
pub fn table_warnings(schema: &SchemaModel, table: &TableModel) -> Vec<String> {
    schema
        .warnings
        .iter()
        .filter(|issue| issue.table_id() == Some(table.id.as_str()))
        .map(ToString::to_string)
        .collect()
}

/// Relationship list.
pub fn relationships(schema: &SchemaModel, config: &AnalysisConfig) -> String {
    let mut lines = vec!["## Relationships".to_string(), String::new()];
    if !config.compute_relationships {
        lines.push("Relationship analysis is disabled.".to_string());
    } else if schema.relationships.is_empty() {
        lines.push("No relationships between analyzed tables.".to_string());
    } else {
        lines.extend(
            schema
                .relationships
                .iter()
                .map(|edge| format!("- {}", relationship_line(schema, edge, config))),
        );
    }
    to_text(lines)
}

/// Statistics view.
pub fn statistics(schema: &SchemaModel) -> String {
    let mut lines = vec!["## Statistics".to_string(), String::new()];
    match &schema.statistics {
        StatisticsOutcome::Computed(stats) => lines.extend(statistics_lines(stats)),
        StatisticsOutcome::Failed { error } => {
            lines.push(format!("Statistics unavailable: {}", error));
        }
        StatisticsOutcome::Skipped => lines.push("Statistics were not computed.".to_string()),
    }
    to_text(lines)
}

/// Every view concatenated, truncated at [`FULL_SCHEMA_LIMIT`] characters.
pub fn full_schema(schema: &SchemaModel, config: &AnalysisConfig) -> String {
    let mut out = overview(schema, config);
    for table in &schema.tables {
        out.push('\n');
        out.push_str(&table_detail(schema, table, config));
    }
    out.push('\n');
    out.push_str(&relationships(schema, config));
    if !matches!(schema.statistics, StatisticsOutcome::Skipped) {
        out.push('\n');
        out.push_str(&statistics(schema));
    }
    truncate_with_notice(out, FULL_SCHEMA_LIMIT)
}

/// Joins lines with a trailing newline.
fn to_text(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Cuts `text` after `limit` characters and appends a notice.
pub fn truncate_with_notice(text: String, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}\n\n{}\n", &text[..cut], TRUNCATION_NOTICE),
        None => text,
    }
}

/// Bullet facts shown above a table's field list.
pub fn table_facts(table: &TableModel, config: &AnalysisConfig) -> Vec<String> {
    let mut facts = Vec::new();
    if config.include_field_ids {
        facts.push(format!("Table ID: `{}`", table.id));
    }
    facts.push(format!("Primary field: {}", table.primary_field_name));
    facts.push(format!("Fields: {}", table.fields.len()));
    facts.push(format!("Views: {}", table.views.len()));
    facts.push(format!("Records: {}", table.record_count));
    facts
}

/// Markdown table of a table's fields, header rows included.
pub fn field_table(schema: &SchemaModel, table: &TableModel, config: &AnalysisConfig) -> Vec<String> {
    let mut rows = if config.include_field_ids {
        vec![
            "| ID | Field | Type | Category | Details |".to_string(),
            "|---|---|---|---|---|".to_string(),
        ]
    } else {
        vec![
            "| Field | Type | Category | Details |".to_string(),
            "|---|---|---|---|".to_string(),
        ]
    };

    for field in &table.fields {
        let mut name = cell(&field.name);
        if field.id == table.primary_field_id {
            name.push_str(" (primary)");
        }
        let details = cell(&field_details(schema, table, field));
        let row = if config.include_field_ids {
            format!(
                "| `{}` | {} | {} | {} | {} |",
                field.id, name, field.field_type, field.category, details
            )
        } else {
            format!(
                "| {} | {} | {} | {} |",
                name, field.field_type, field.category, details
            )
        };
        rows.push(row);
    }
    rows
}

/// Short description of a field's options and link target.
pub fn field_details(schema: &SchemaModel, table: &TableModel, field: &FieldModel) -> String {
    let mut parts = Vec::new();
    if field.is_computed && field.category != FieldCategory::Computed {
        parts.push("computed".to_string());
    }

    if let Some(target) = &field.linked_table_id {
        let cardinality = if field.prefers_single_link.unwrap_or(false) {
            "One-to-One/Many"
        } else {
            "Many-to-Many"
        };
        parts.push(format!(
            "links to {} ({})",
            schema.table_name(target),
            cardinality
        ));
    }

    let via = |link_field: &Option<String>| {
        link_field
            .as_deref()
            .map(|id| format!("via {}", schema.field_name(&table.id, id)))
    };

    match &field.options {
        FieldOptions::Empty => {}
        FieldOptions::Select { choices } => {
            if !choices.is_empty() {
                parts.push(format!("choices: {}", choice_summary(choices)));
            }
        }
        FieldOptions::Numeric { precision, symbol } => {
            if let Some(symbol) = symbol {
                parts.push(format!("symbol {}", symbol));
            }
            if let Some(precision) = precision {
                parts.push(format!("precision {}", precision));
            }
        }
        FieldOptions::Date {
            date_format,
            time_format,
            time_zone,
        } => {
            if let Some(format) = date_format.as_ref().and_then(format_name) {
                parts.push(format!("date format {}", format));
            }
            if let Some(format) = time_format.as_ref().and_then(format_name) {
                parts.push(format!("time format {}", format));
            }
            if let Some(zone) = time_zone {
                parts.push(format!("time zone {}", zone));
            }
        }
        FieldOptions::Checkbox { icon, color } | FieldOptions::Rating { icon, color, .. } => {
            if let FieldOptions::Rating { max: Some(max), .. } = &field.options {
                parts.push(format!("max {}", max));
            }
            if let Some(icon) = icon {
                parts.push(format!("icon {}", icon));
            }
            if let Some(color) = color {
                parts.push(format!("color {}", color));
            }
        }
        FieldOptions::Lookup {
            record_link_field_id,
            ..
        }
        | FieldOptions::Count {
            record_link_field_id,
        } => parts.extend(via(record_link_field_id)),
        FieldOptions::Rollup {
            record_link_field_id,
            referenced_field_ids,
            ..
        } => {
            parts.extend(via(record_link_field_id));
            if let Some(ids) = referenced_field_ids.as_ref().filter(|ids| !ids.is_empty()) {
                parts.push(format!("references {} fields", ids.len()));
            }
        }
        FieldOptions::Formula { is_valid } => match is_valid {
            Some(true) => parts.push("valid formula".to_string()),
            Some(false) => parts.push("invalid formula".to_string()),
            None => {}
        },
    }

    parts.join("; ")
}

fn choice_summary(choices: &[basesurveyor_core::models::SelectChoice]) -> String {
    let shown: Vec<&str> = choices
        .iter()
        .take(MAX_CHOICES_SHOWN)
        .map(|c| c.name.as_str())
        .collect();
    let summary = shown.join(", ");
    match choices.len().saturating_sub(MAX_CHOICES_SHOWN) {
        0 => summary,
        hidden => format!("{} (+{} more)", summary, hidden),
    }
}

/// Date and time formats arrive either as `{name, format}` objects or as
/// plain strings.
fn format_name(value: &serde_json::Value) -> Option<String> {
    value
        .get("name")
        .and_then(serde_json::Value::as_str)
        .or_else(|| value.as_str())
        .map(str::to_string)
}

/// One line per view.
pub fn view_line(view: &ViewModel) -> String {
    match &view.view_type {
        Some(view_type) => format!("{} ({})", view.name, view_type),
        None => view.name.clone(),
    }
}

/// One line per relationship edge.
pub fn relationship_line(
    schema: &SchemaModel,
    edge: &RelationshipEdge,
    config: &AnalysisConfig,
) -> String {
    let from_table = schema.table_name(&edge.from_table_id);
    let field = schema.field_name(&edge.from_table_id, &edge.from_field_id);
    let to_table = schema.table_name(&edge.to_table_id);
    let line = format!(
        "{}.{} -> {} ({})",
        from_table,
        field,
        to_table,
        edge.cardinality()
    );
    if config.include_field_ids {
        format!(
            "{} [`{}`.`{}` -> `{}`]",
            line, edge.from_table_id, edge.from_field_id, edge.to_table_id
        )
    } else {
        line
    }
}

/// Statistics as Markdown lines.
pub fn statistics_lines(stats: &StatisticsAggregate) -> Vec<String> {
    let mut lines = vec![
        format!("- Total tables: {}", stats.total_tables),
        format!("- Total fields: {}", stats.total_fields),
        format!("- Total views: {}", stats.total_views),
        format!("- Total records: {}", stats.total_records),
        String::new(),
        "### Field Categories".to_string(),
        String::new(),
    ];
    lines.extend(
        stats
            .field_category_distribution
            .iter()
            .map(|(category, count)| format!("- {}: {}", category, count)),
    );

    lines.extend(["".to_string(), "### Field Types".to_string(), String::new()]);
    lines.extend(
        stats
            .field_type_distribution
            .iter()
            .map(|(field_type, count)| format!("- {}: {}", field_type, count)),
    );

    lines.extend(["".to_string(), "### Table Sizes".to_string(), String::new()]);
    lines.extend(stats.table_sizes.iter().map(|size| {
        format!(
            "- {}: {} records, {} fields",
            size.table_name, size.record_count, size.field_count
        )
    }));
    lines
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
