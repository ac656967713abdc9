//! Read-only data-source contract for base introspection.
//!
//! The schema builder only ever sees a base through these traits. A source
//! exposes its tables in order; each table exposes its raw fields, raw views
//! and a record query. Nothing here can mutate the source.
//!
//! # Module Structure
//! - `snapshot`: a source backed by a JSON export of a base's metadata
//!
//! # Object Safety
//! Both traits are object-safe, allowing dynamic dispatch through
//! `&dyn BaseSource` / `&dyn TableSource`.

use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

pub mod snapshot;

pub use snapshot::SnapshotBase;

/// Field definition as exposed by the source.
///
/// Every attribute is optional here; completeness is checked by the table
/// walker so that a malformed field can be reported and skipped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawField {
    /// Field identifier
    pub id: Option<String>,
    /// Field display name
    pub name: Option<String>,
    /// Type tag such as `singleSelect`
    pub field_type: Option<String>,
    /// Field description
    pub description: Option<String>,
    /// Whether the source computes the value
    pub is_computed: Option<bool>,
    /// Opaque options whose shape depends on `field_type`
    pub options: Option<Value>,
}

impl RawField {
    /// Reads a field definition from a JSON object.
    ///
    /// Attributes that are missing or carry the wrong JSON type are `None`.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: str_attr(value, "id"),
            name: str_attr(value, "name"),
            field_type: str_attr(value, "type"),
            description: str_attr(value, "description"),
            is_computed: value.get("isComputed").and_then(Value::as_bool),
            options: value.get("options").filter(|v| !v.is_null()).cloned(),
        }
    }
}

/// View definition as exposed by the source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawView {
    /// View identifier
    pub id: Option<String>,
    /// View display name
    pub name: Option<String>,
    /// View type tag
    pub view_type: Option<String>,
}

impl RawView {
    /// Reads a view definition from a JSON object.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: str_attr(value, "id"),
            name: str_attr(value, "name"),
            view_type: str_attr(value, "type"),
        }
    }
}

/// Identity of one record returned by a record query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHandle {
    /// Record identifier
    pub id: String,
    /// Primary-field display value, if the record exposes one
    pub name: Option<String>,
}

impl RecordHandle {
    /// Reads a record identity from a JSON object; `None` without an id.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: str_attr(value, "id")?,
            name: str_attr(value, "name").filter(|n| !n.is_empty()),
        })
    }
}

/// Parameters of a record query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordQuery {
    /// Field ids to project; empty requests identities only
    pub fields: Vec<String>,
}

impl RecordQuery {
    /// Query that loads record identities without any field values.
    pub fn identity_only() -> Self {
        Self::default()
    }

    /// Returns true when no field values are requested.
    pub fn is_identity_only(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One table of a base.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Table id
    fn id(&self) -> &str;

    /// Table name
    fn name(&self) -> &str;

    /// Optional table description
    fn description(&self) -> Option<&str>;

    /// Raw field definitions in source order; the first is the primary field.
    ///
    /// # Errors
    /// Returns an error if the field list cannot be read.
    fn fields(&self) -> Result<Vec<RawField>>;

    /// Raw view definitions in source order.
    ///
    /// # Errors
    /// Returns an error if the view list cannot be read.
    fn views(&self) -> Result<Vec<RawView>>;

    /// Loads the table's records in source order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    async fn select_records(&self, query: &RecordQuery) -> Result<Vec<RecordHandle>>;
}

/// A base: the top-level database being introspected.
#[async_trait]
pub trait BaseSource: Send + Sync {
    /// Base id
    fn id(&self) -> &str;

    /// Base name
    fn name(&self) -> &str;

    /// Tables in source order.
    ///
    /// # Errors
    /// Returns an error if the base cannot be reached.
    async fn tables(&self) -> Result<Vec<&dyn TableSource>>;
}

fn str_attr(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_field_from_value() {
        let field = RawField::from_value(&json!({
            "id": "fld1",
            "name": "Status",
            "type": "singleSelect",
            "isComputed": false,
            "options": {"choices": []}
        }));

        assert_eq!(field.id.as_deref(), Some("fld1"));
        assert_eq!(field.field_type.as_deref(), Some("singleSelect"));
        assert_eq!(field.is_computed, Some(false));
        assert_eq!(field.options, Some(json!({"choices": []})));
        assert_eq!(field.description, None);
    }

    #[test]
    fn test_raw_field_wrong_types_are_absent() {
        let field = RawField::from_value(&json!({"id": 42, "name": "Count", "options": null}));
        assert_eq!(field.id, None);
        assert_eq!(field.name.as_deref(), Some("Count"));
        assert_eq!(field.field_type, None);
        assert_eq!(field.options, None);
    }

    #[test]
    fn test_raw_view_from_value() {
        let view = RawView::from_value(&json!({"id": "viw1", "name": "Grid view", "type": "grid"}));
        assert_eq!(view.view_type.as_deref(), Some("grid"));

        let view = RawView::from_value(&json!({"name": "Orphan"}));
        assert_eq!(view.id, None);
    }

    #[test]
    fn test_record_handle_from_value() {
        let record = RecordHandle::from_value(&json!({"id": "rec1", "name": ""})).unwrap();
        assert_eq!(record.name, None);
        assert!(RecordHandle::from_value(&json!({"name": "No id"})).is_none());
    }

    #[test]
    fn test_identity_only_query() {
        assert!(RecordQuery::identity_only().is_identity_only());
        let projected = RecordQuery {
            fields: vec!["fld1".to_string()],
        };
        assert!(!projected.is_identity_only());
    }
}
