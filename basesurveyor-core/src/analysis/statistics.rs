//! Aggregate statistics derivation.

use crate::error::AnalysisIssue;
use crate::models::{StatisticsAggregate, TableModel, TableSize};
use std::collections::BTreeMap;

/// Derives totals, distributions and table sizes in a single pass.
///
/// # Errors
/// Returns [`AnalysisIssue::StatisticsDerivation`] if any count overflows.
/// No partial aggregate is returned on failure.
pub fn derive_statistics(tables: &[TableModel]) -> Result<StatisticsAggregate, AnalysisIssue> {
    let mut aggregate = StatisticsAggregate {
        total_tables: tables.len(),
        total_fields: 0,
        total_views: 0,
        total_records: 0,
        field_type_distribution: BTreeMap::new(),
        field_category_distribution: BTreeMap::new(),
        table_sizes: Vec::with_capacity(tables.len()),
    };

    for table in tables {
        aggregate.total_fields = add(aggregate.total_fields, table.fields.len(), "field total")?;
        aggregate.total_views = add(aggregate.total_views, table.views.len(), "view total")?;
        aggregate.total_records =
            add(aggregate.total_records, table.record_count, "record total")?;

        for field in &table.fields {
            let by_type = aggregate
                .field_type_distribution
                .entry(field.field_type.clone())
                .or_insert(0);
            *by_type = add(*by_type, 1, "field type distribution")?;

            let by_category = aggregate
                .field_category_distribution
                .entry(field.category)
                .or_insert(0);
            *by_category = add(*by_category, 1, "field category distribution")?;
        }

        aggregate.table_sizes.push(TableSize {
            table_id: table.id.clone(),
            table_name: table.name.clone(),
            record_count: table.record_count,
            field_count: table.fields.len(),
        });
    }

    // sort_by is stable: ties keep analysis order
    aggregate
        .table_sizes
        .sort_by(|a, b| b.record_count.cmp(&a.record_count));

    Ok(aggregate)
}

fn add(total: usize, amount: usize, what: &str) -> Result<usize, AnalysisIssue> {
    total
        .checked_add(amount)
        .ok_or_else(|| AnalysisIssue::StatisticsDerivation {
            reason: format!("{} overflowed", what),
        })
}
