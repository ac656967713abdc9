//! Table walker.
//!
//! Walks one table's metadata and produces a [`TableModel`]. Every failure
//! below the table level is contained: a malformed field or view is skipped,
//! bad options become empty options, and a failed record query leaves the
//! record count at zero. Each contained failure is returned as an
//! [`AnalysisIssue`] next to the model.

use crate::config::AnalysisConfig;
use crate::error::AnalysisIssue;
use crate::fields::{NormalizedOptions, categorize, try_normalize};
use crate::models::{FieldModel, SampleRecord, TableModel, UNKNOWN, ViewModel};
use crate::source::{RawField, RawView, RecordHandle, RecordQuery, TableSource};

/// A walked table plus the failures contained while walking it.
#[derive(Debug, Clone)]
pub struct TableWalk {
    /// The table model
    pub table: TableModel,
    /// Contained failures, in encounter order
    pub issues: Vec<AnalysisIssue>,
}

/// Walks tables using a fixed configuration.
#[derive(Debug, Clone, Copy)]
pub struct TableWalker<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> TableWalker<'a> {
    /// Creates a walker for the given configuration.
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Walks one table.
    ///
    /// Fields and views are processed strictly in source order. The only
    /// suspension point is the record query.
    pub async fn walk(&self, table: &dyn TableSource) -> TableWalk {
        let table_id = table.id().to_string();
        let mut model = TableModel::new(table.id(), table.name());
        model.description = table.description().map(str::to_string);
        let mut issues = Vec::new();

        let raw_fields = table.fields().unwrap_or_else(|e| {
            tracing::warn!("Field list of table '{}' unavailable: {}", table_id, e);
            Vec::new()
        });

        if let Some(primary) = raw_fields.first() {
            model.primary_field_id = primary.id.clone().unwrap_or_else(|| UNKNOWN.to_string());
            model.primary_field_name =
                primary.name.clone().unwrap_or_else(|| UNKNOWN.to_string());
        }

        match table.select_records(&RecordQuery::identity_only()).await {
            Ok(records) => {
                model.record_count = records.len();
                model.sample_records = sample_records(&records, self.config.max_sample_records);
            }
            Err(e) => {
                tracing::warn!("Record query failed for table '{}': {}", table_id, e);
                issues.push(AnalysisIssue::RecordQuery {
                    table_id: table_id.clone(),
                    reason: e.to_string(),
                });
            }
        }

        for (position, raw) in raw_fields.iter().enumerate() {
            match analyze_field(&table_id, position, raw) {
                Ok((field, option_issue)) => {
                    tracing::debug!(
                        "Field '{}' ({}) -> {}",
                        field.name,
                        field.field_type,
                        field.category
                    );
                    issues.extend(option_issue);
                    model.fields.push(field);
                }
                Err(issue) => {
                    tracing::warn!("Skipping field: {}", issue);
                    issues.push(issue);
                }
            }
        }

        let raw_views = table.views().unwrap_or_else(|e| {
            tracing::warn!("View list of table '{}' unavailable: {}", table_id, e);
            Vec::new()
        });

        for (position, raw) in raw_views.iter().enumerate() {
            match analyze_view(&table_id, position, raw) {
                Ok(view) => model.views.push(view),
                Err(issue) => {
                    tracing::warn!("Skipping view: {}", issue);
                    issues.push(issue);
                }
            }
        }

        TableWalk {
            table: model,
            issues,
        }
    }
}

/// Keeps the first `max` record identities.
///
/// Records without a display name are labelled by their 1-based position.
fn sample_records(records: &[RecordHandle], max: usize) -> Vec<SampleRecord> {
    records
        .iter()
        .take(max)
        .zip(1usize..)
        .map(|(record, ordinal)| SampleRecord {
            id: record.id.clone(),
            name: record
                .name
                .clone()
                .unwrap_or_else(|| format!("Record {}", ordinal)),
        })
        .collect()
}

/// Builds a field model, or reports the field as malformed.
///
/// An option extraction failure does not reject the field; it is returned
/// alongside a field carrying empty options.
fn analyze_field(
    table_id: &str,
    position: usize,
    raw: &RawField,
) -> Result<(FieldModel, Option<AnalysisIssue>), AnalysisIssue> {
    let (Some(id), Some(name), Some(field_type)) = (&raw.id, &raw.name, &raw.field_type) else {
        return Err(AnalysisIssue::MalformedField {
            table_id: table_id.to_string(),
            position,
            missing: missing_attributes(&[
                ("id", raw.id.is_none()),
                ("name", raw.name.is_none()),
                ("type", raw.field_type.is_none()),
            ]),
        });
    };

    let (normalized, option_issue) = match try_normalize(field_type, raw.options.as_ref()) {
        Ok(normalized) => (normalized, None),
        Err(e) => {
            tracing::warn!(
                "Options of field '{}' in table '{}' discarded: {}",
                id,
                table_id,
                e
            );
            let issue = AnalysisIssue::OptionExtraction {
                table_id: table_id.to_string(),
                field_id: id.clone(),
                field_type: field_type.clone(),
                reason: e.to_string(),
            };
            (NormalizedOptions::default(), Some(issue))
        }
    };

    let NormalizedOptions { options, link } = normalized;
    let (linked_table_id, inverse_link_field_id, prefers_single_link) = match link {
        Some(link) => (
            link.linked_table_id,
            link.inverse_link_field_id,
            Some(link.prefers_single_record_link),
        ),
        None => (None, None, None),
    };

    let field = FieldModel {
        id: id.clone(),
        name: name.clone(),
        field_type: field_type.clone(),
        description: raw.description.clone(),
        category: categorize(field_type),
        is_computed: raw.is_computed.unwrap_or(false),
        options,
        linked_table_id,
        inverse_link_field_id,
        prefers_single_link,
    };

    Ok((field, option_issue))
}

/// Builds a view model; a view without id or name is malformed.
fn analyze_view(table_id: &str, position: usize, raw: &RawView) -> Result<ViewModel, AnalysisIssue> {
    let (Some(id), Some(name)) = (&raw.id, &raw.name) else {
        return Err(AnalysisIssue::MalformedView {
            table_id: table_id.to_string(),
            position,
            missing: missing_attributes(&[
                ("id", raw.id.is_none()),
                ("name", raw.name.is_none()),
            ]),
        });
    };

    Ok(ViewModel {
        id: id.clone(),
        name: name.clone(),
        view_type: raw.view_type.clone(),
    })
}

fn missing_attributes(checks: &[(&str, bool)]) -> String {
    checks
        .iter()
        .filter(|(_, missing)| *missing)
        .map(|(attr, _)| *attr)
        .collect::<Vec<_>>()
        .join(", ")
}
