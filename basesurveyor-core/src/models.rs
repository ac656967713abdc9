//! Core data models for base schema representation.
//!
//! This module defines the descriptive model produced by an analysis run:
//! tables with their fields and views, the relationship graph inferred from
//! link fields, and the derived statistics. All models serialize with
//! camelCase keys, which is the shape used by the structured-data export.

use crate::error::AnalysisIssue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format version of the serialized schema model
pub const FORMAT_VERSION: &str = "1.0";

/// Placeholder used when an identity cannot be read from the source.
pub const UNKNOWN: &str = "unknown";

/// Semantic grouping assigned to every field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldCategory {
    Text,
    Numeric,
    Date,
    Select,
    Relational,
    Attachment,
    Checkbox,
    User,
    Computed,
    Other,
}

impl FieldCategory {
    /// All categories in display order.
    pub const ALL: [FieldCategory; 10] = [
        FieldCategory::Text,
        FieldCategory::Numeric,
        FieldCategory::Date,
        FieldCategory::Select,
        FieldCategory::Relational,
        FieldCategory::Attachment,
        FieldCategory::Checkbox,
        FieldCategory::User,
        FieldCategory::Computed,
        FieldCategory::Other,
    ];

    /// Upper-case tag as used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::Text => "TEXT",
            FieldCategory::Numeric => "NUMERIC",
            FieldCategory::Date => "DATE",
            FieldCategory::Select => "SELECT",
            FieldCategory::Relational => "RELATIONAL",
            FieldCategory::Attachment => "ATTACHMENT",
            FieldCategory::Checkbox => "CHECKBOX",
            FieldCategory::User => "USER",
            FieldCategory::Computed => "COMPUTED",
            FieldCategory::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice of a single or multiple select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectChoice {
    /// Choice id, `unknown` when the source omitted it
    pub id: String,
    /// Display name, `Unnamed` when absent
    pub name: String,
    /// Color token, `default` when absent
    pub color: String,
}

/// Canonical field options, one arm per field-type family.
///
/// Only the keys relevant to each family are carried; everything else the
/// source exposes is dropped during normalization. Types without a family
/// (and fields whose options were absent or malformed) get [`FieldOptions::Empty`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FieldOptions {
    /// No options carried
    #[default]
    Empty,
    /// `singleSelect`, `multipleSelects`
    Select { choices: Vec<SelectChoice> },
    /// `number`, `percent`, `currency`
    Numeric {
        #[serde(skip_serializing_if = "Option::is_none")]
        precision: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
    },
    /// `date`, `dateTime`
    Date {
        #[serde(skip_serializing_if = "Option::is_none")]
        date_format: Option<serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        time_format: Option<serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
    },
    /// `checkbox`
    Checkbox {
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// `rating`
    Rating {
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// `lookup`
    Lookup {
        #[serde(skip_serializing_if = "Option::is_none")]
        record_link_field_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        field_id_in_linked_table: Option<String>,
    },
    /// `rollup`
    Rollup {
        #[serde(skip_serializing_if = "Option::is_none")]
        record_link_field_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        field_id_in_linked_table: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        referenced_field_ids: Option<Vec<String>>,
    },
    /// `count`
    Count {
        #[serde(skip_serializing_if = "Option::is_none")]
        record_link_field_id: Option<String>,
    },
    /// `formula`
    Formula {
        #[serde(skip_serializing_if = "Option::is_none")]
        is_valid: Option<bool>,
    },
}

impl FieldOptions {
    /// Returns true when no options are carried.
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldOptions::Empty)
    }
}

/// Field information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldModel {
    /// Field identifier
    pub id: String,
    /// Field display name
    pub name: String,
    /// Raw type tag as reported by the source
    #[serde(rename = "type")]
    pub field_type: String,
    /// Field description
    pub description: Option<String>,
    /// Semantic category derived from the type tag
    pub category: FieldCategory,
    /// Whether the source computes the value
    pub is_computed: bool,
    /// Normalized type-specific options
    pub options: FieldOptions,
    /// Target table of a link field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_table_id: Option<String>,
    /// Field on the target table that links back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_link_field_id: Option<String>,
    /// Link field limited to one record, as declared by this side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefers_single_link: Option<bool>,
}

impl FieldModel {
    /// True for link fields that resolved a target table.
    pub fn is_resolved_link(&self) -> bool {
        self.category == FieldCategory::Relational
            && self.field_type == "multipleRecordLinks"
            && self.linked_table_id.is_some()
    }
}

/// View information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    /// View identifier
    pub id: String,
    /// View display name
    pub name: String,
    /// View type such as `grid` or `kanban`
    #[serde(rename = "type")]
    pub view_type: Option<String>,
}

/// Identity of one sampled record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Record identifier
    pub id: String,
    /// Primary-field value or `Record <n>`
    pub name: String,
}

/// Table information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableModel {
    /// Table identifier
    pub id: String,
    /// Table display name
    pub name: String,
    /// Table description
    pub description: Option<String>,
    /// Id of the first source field, or `UNKNOWN`
    pub primary_field_id: String,
    /// Name of the first source field, or `UNKNOWN`
    pub primary_field_name: String,
    /// Fields in source order; the first field is the primary field
    pub fields: Vec<FieldModel>,
    /// Views in source order
    pub views: Vec<ViewModel>,
    /// Records returned by the bounded query; zero when it failed
    pub record_count: usize,
    /// At most `max_sample_records` record identities
    pub sample_records: Vec<SampleRecord>,
}

impl TableModel {
    /// Creates a table with no fields, views or records.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            primary_field_id: UNKNOWN.to_string(),
            primary_field_name: UNKNOWN.to_string(),
            fields: Vec::new(),
            views: Vec::new(),
            record_count: 0,
            sample_records: Vec::new(),
        }
    }

    /// Looks up a field by id.
    pub fn field(&self, field_id: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Iterates over link fields that resolved a target table.
    pub fn link_fields(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields.iter().filter(|f| f.is_resolved_link())
    }
}

/// Kind of relationship between two tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    LinkedRecord,
}

/// Directed edge from the table owning a link field to its target table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    /// Table owning the link field
    pub from_table_id: String,
    /// The link field
    pub from_field_id: String,
    /// Linked table
    pub to_table_id: String,
    /// Edge kind
    pub kind: RelationshipKind,
    /// Declared single-record preference of the link field
    pub prefers_single_link: bool,
}

impl RelationshipEdge {
    /// Display label for the declared cardinality.
    ///
    /// Only the owning side's declaration is consulted.
    pub fn cardinality(&self) -> &'static str {
        if self.prefers_single_link {
            "One-to-One/Many"
        } else {
            "Many-to-Many"
        }
    }
}

/// Size entry for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSize {
    /// Table identifier
    pub table_id: String,
    /// Table display name
    pub table_name: String,
    /// Record count of the table
    pub record_count: usize,
    /// Analyzed field count of the table
    pub field_count: usize,
}

/// Aggregate statistics across all analyzed tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsAggregate {
    /// Number of analyzed tables
    pub total_tables: usize,
    /// Fields across all tables
    pub total_fields: usize,
    /// Views across all tables
    pub total_views: usize,
    /// Records across all tables
    pub total_records: usize,
    /// Field count per raw type tag
    pub field_type_distribution: BTreeMap<String, usize>,
    /// Field count per category
    pub field_category_distribution: BTreeMap<FieldCategory, usize>,
    /// Sorted by record count, descending; ties keep analysis order
    pub table_sizes: Vec<TableSize>,
}

/// Result of the statistics pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StatisticsOutcome {
    /// Statistics were derived
    Computed(StatisticsAggregate),
    /// The pass failed as a whole; no partial figures are kept
    Failed { error: String },
    /// Statistics were disabled by configuration
    Skipped,
}

impl StatisticsOutcome {
    /// Returns the aggregate when the pass succeeded.
    pub fn aggregate(&self) -> Option<&StatisticsAggregate> {
        match self {
            StatisticsOutcome::Computed(aggregate) => Some(aggregate),
            _ => None,
        }
    }
}

/// Complete base schema representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaModel {
    /// Output format version
    pub format_version: String,
    /// Base identifier
    pub base_id: String,
    /// Base display name
    pub base_name: String,
    /// Tables in source order
    pub tables: Vec<TableModel>,
    /// Derived link edges
    pub relationships: Vec<RelationshipEdge>,
    /// Outcome of the statistics pass
    pub statistics: StatisticsOutcome,
    /// Contained failures, in the order they were encountered
    #[serde(default)]
    pub warnings: Vec<AnalysisIssue>,
    /// When analysis finished
    pub generated_at: DateTime<Utc>,
    /// Version of the tool that produced the model
    pub generator_version: String,
}

impl SchemaModel {
    /// Creates a new empty schema model
    pub fn new(base_id: impl Into<String>, base_name: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            base_id: base_id.into(),
            base_name: base_name.into(),
            tables: Vec::new(),
            relationships: Vec::new(),
            statistics: StatisticsOutcome::Skipped,
            warnings: Vec::new(),
            generated_at: Utc::now(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Looks up a table by id.
    pub fn table(&self, table_id: &str) -> Option<&TableModel> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    /// Resolves a table name, falling back to the id itself.
    pub fn table_name<'a>(&'a self, table_id: &'a str) -> &'a str {
        self.table(table_id).map_or(table_id, |t| t.name.as_str())
    }

    /// Resolves a field name within a table, falling back to the id itself.
    pub fn field_name<'a>(&'a self, table_id: &str, field_id: &'a str) -> &'a str {
        self.table(table_id)
            .and_then(|t| t.field(field_id))
            .map_or(field_id, |f| f.name.as_str())
    }

    /// Total number of fields across all tables
    pub fn field_count(&self) -> usize {
        self.tables.iter().map(|t| t.fields.len()).sum()
    }

    /// Total number of views across all tables
    pub fn view_count(&self) -> usize {
        self.tables.iter().map(|t| t.views.len()).sum()
    }

    /// Adds a contained failure to the model
    pub fn add_warning(&mut self, issue: AnalysisIssue) {
        self.warnings.push(issue);
    }
}
