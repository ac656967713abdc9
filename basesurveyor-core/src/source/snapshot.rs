//! Base source backed by a JSON metadata snapshot.
//!
//! A snapshot is a JSON export of a base's metadata:
//!
//! ```json
//! {
//!   "id": "appXXXXXXXXXXXXXX",
//!   "name": "Projects",
//!   "tables": [{
//!     "id": "tblXXXXXXXXXXXXXX",
//!     "name": "Tasks",
//!     "description": "Work items",
//!     "fields": [{"id": "fld...", "name": "Name", "type": "singleLineText"}],
//!     "views": [{"id": "viw...", "name": "Grid view", "type": "grid"}],
//!     "records": [{"id": "rec...", "name": "Write docs"}]
//!   }]
//! }
//! ```
//!
//! Table `fields`, `views` and `records` are kept as raw JSON so that
//! malformed entries survive loading and are reported by the walker.

use super::{BaseSource, RawField, RawView, RecordHandle, RecordQuery, TableSource};
use crate::{Result, error::SurveyorError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// A base loaded from a snapshot file
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotBase {
    /// Base identifier
    pub id: String,
    /// Base display name
    pub name: String,
    /// Tables in snapshot order
    #[serde(default)]
    pub tables: Vec<SnapshotTable>,
}

/// One table of a snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotTable {
    /// Table identifier
    pub id: String,
    /// Table display name
    pub name: String,
    /// Table description
    #[serde(default)]
    pub description: Option<String>,
    /// Raw field list; must be an array when present
    #[serde(default)]
    pub fields: Value,
    /// Raw view list; must be an array when present
    #[serde(default)]
    pub views: Value,
    /// Raw record list; must be an array when present
    #[serde(default)]
    pub records: Value,
}

impl SnapshotBase {
    /// Parses a snapshot from a JSON string.
    ///
    /// # Errors
    /// Returns a serialization error if the JSON does not describe a base.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SurveyorError::Serialization {
            context: "Failed to parse base snapshot".to_string(),
            source: e,
        })
    }

    /// Loads a snapshot file.
    ///
    /// Files ending in `.zst` are zstd-decoded first, which requires the
    /// `compression` feature.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, decoded or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SurveyorError::Io {
                context: format!("Failed to read snapshot {}", path.display()),
                source: e,
            })?;

        let bytes = if path.extension().is_some_and(|ext| ext == "zst") {
            decompress(&bytes)?
        } else {
            bytes
        };

        tracing::debug!(
            "Loaded {} bytes of snapshot data from {}",
            bytes.len(),
            path.display()
        );

        serde_json::from_slice(&bytes).map_err(|e| SurveyorError::Serialization {
            context: format!("Failed to parse snapshot {}", path.display()),
            source: e,
        })
    }
}

#[cfg(feature = "compression")]
fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    zstd::decode_all(bytes).map_err(|e| SurveyorError::Io {
        context: "Failed to decompress snapshot".to_string(),
        source: e,
    })
}

#[cfg(not(feature = "compression"))]
fn decompress(_bytes: &[u8]) -> Result<Vec<u8>> {
    Err(SurveyorError::configuration(
        "Compressed snapshots not available. Compile with --features compression",
    ))
}

/// Reads a JSON list attribute; absent means empty, any non-array is an error.
fn json_list<'a>(value: &'a Value, what: &str, table: &str) -> Result<&'a [Value]> {
    match value {
        Value::Null => Ok(&[]),
        Value::Array(items) => Ok(items),
        _ => Err(SurveyorError::source_message(format!(
            "{} of table '{}' is not a list",
            what, table
        ))),
    }
}

#[async_trait]
impl TableSource for SnapshotTable {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn fields(&self) -> Result<Vec<RawField>> {
        let items = json_list(&self.fields, "Field list", &self.id)?;
        Ok(items.iter().map(RawField::from_value).collect())
    }

    fn views(&self) -> Result<Vec<RawView>> {
        let items = json_list(&self.views, "View list", &self.id)?;
        Ok(items.iter().map(RawView::from_value).collect())
    }

    async fn select_records(&self, query: &RecordQuery) -> Result<Vec<RecordHandle>> {
        if !query.is_identity_only() {
            tracing::trace!(
                "Snapshot records carry identities only; ignoring {} projected fields",
                query.fields.len()
            );
        }

        let items = json_list(&self.records, "Record list", &self.id)?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                RecordHandle::from_value(item).ok_or_else(|| {
                    SurveyorError::source_message(format!(
                        "Record #{} of table '{}' has no id",
                        index, self.id
                    ))
                })
            })
            .collect()
    }
}

#[async_trait]
impl BaseSource for SnapshotBase {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn tables(&self) -> Result<Vec<&dyn TableSource>> {
        Ok(self
            .tables
            .iter()
            .map(|table| table as &dyn TableSource)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "id": "app1",
        "name": "Projects",
        "tables": [
            {
                "id": "tbl1",
                "name": "Tasks",
                "fields": [
                    {"id": "fld1", "name": "Name", "type": "singleLineText"},
                    {"id": "fld2", "name": "Broken"}
                ],
                "views": [{"id": "viw1", "name": "Grid view", "type": "grid"}],
                "records": [{"id": "rec1", "name": "Write docs"}, {"id": "rec2"}]
            },
            {
                "id": "tbl2",
                "name": "People",
                "fields": "unavailable",
                "records": {"error": "timeout"}
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_snapshot_tables_in_order() {
        let base = SnapshotBase::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(base.id(), "app1");

        let tables = base.tables().await.unwrap();
        let ids: Vec<_> = tables.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["tbl1", "tbl2"]);
    }

    #[tokio::test]
    async fn test_snapshot_table_accessors() {
        let base = SnapshotBase::from_json_str(SNAPSHOT).unwrap();
        let tasks = &base.tables[0];

        let fields = tasks.fields().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].field_type, None);

        let views = tasks.views().unwrap();
        assert_eq!(views[0].name.as_deref(), Some("Grid view"));

        let records = tasks
            .select_records(&RecordQuery::identity_only())
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, None);
    }

    #[tokio::test]
    async fn test_snapshot_malformed_lists_fail() {
        let base = SnapshotBase::from_json_str(SNAPSHOT).unwrap();
        let people = &base.tables[1];

        assert!(people.fields().is_err());
        assert!(people.views().unwrap().is_empty());
        assert!(
            people
                .select_records(&RecordQuery::identity_only())
                .await
                .is_err()
        );
    }

    #[test]
    fn test_snapshot_invalid_json() {
        let result = SnapshotBase::from_json_str("{\"name\": \"no id\"}");
        assert!(matches!(result, Err(SurveyorError::Serialization { .. })));
    }

    #[tokio::test]
    async fn test_snapshot_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let base = SnapshotBase::load(&path).await.unwrap();
        assert_eq!(base.name, "Projects");
        assert_eq!(base.tables.len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_load_missing_file() {
        let result = SnapshotBase::load(Path::new("/nonexistent/base.json")).await;
        assert!(matches!(result, Err(SurveyorError::Io { .. })));
    }
}
