//! Relationship graph derivation from link fields.

use crate::models::{RelationshipEdge, RelationshipKind, TableModel};
use std::collections::HashSet;

/// Derives one edge per resolved `multipleRecordLinks` field whose target
/// table is part of `tables`.
///
/// Edges point from the table owning the link field to the target table.
/// Links to tables outside the analyzed set are dropped without error, and
/// no reverse edge is synthesized from an inverse field id. Output order
/// follows table order, then field order.
pub fn derive_relationships(tables: &[TableModel]) -> Vec<RelationshipEdge> {
    let present: HashSet<&str> = tables.iter().map(|t| t.id.as_str()).collect();

    let mut edges = Vec::new();
    for table in tables {
        for field in table.link_fields() {
            let Some(target) = field.linked_table_id.as_deref() else {
                continue;
            };

            if !present.contains(target) {
                tracing::debug!(
                    "Link field '{}' of table '{}' targets unanalyzed table '{}'",
                    field.id,
                    table.id,
                    target
                );
                continue;
            }

            edges.push(RelationshipEdge {
                from_table_id: table.id.clone(),
                from_field_id: field.id.clone(),
                to_table_id: target.to_string(),
                kind: RelationshipKind::LinkedRecord,
                prefers_single_link: field.prefers_single_link.unwrap_or(false),
            });
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::categorize;
    use crate::models::{FieldModel, FieldOptions};

    fn field(id: &str, field_type: &str, target: Option<&str>) -> FieldModel {
        FieldModel {
            id: id.to_string(),
            name: id.to_string(),
            field_type: field_type.to_string(),
            description: None,
            category: categorize(field_type),
            is_computed: false,
            options: FieldOptions::Empty,
            linked_table_id: target.map(str::to_string),
            inverse_link_field_id: None,
            prefers_single_link: target.map(|_| false),
        }
    }

    fn table(id: &str, fields: Vec<FieldModel>) -> TableModel {
        let mut table = TableModel::new(id, id);
        table.fields = fields;
        table
    }

    #[test]
    fn test_missing_target_yields_no_edge() {
        let tables = vec![table(
            "t1",
            vec![field("f1", "multipleRecordLinks", Some("t2"))],
        )];
        assert!(derive_relationships(&tables).is_empty());
    }

    #[test]
    fn test_present_target_yields_single_edge() {
        let tables = vec![
            table("t1", vec![field("f1", "multipleRecordLinks", Some("t2"))]),
            table("t2", vec![field("f2", "singleLineText", None)]),
        ];

        let edges = derive_relationships(&tables);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from_table_id, "t1");
        assert_eq!(edges[0].from_field_id, "f1");
        assert_eq!(edges[0].to_table_id, "t2");
        assert_eq!(edges[0].kind, RelationshipKind::LinkedRecord);
    }

    #[test]
    fn test_back_link_is_an_independent_edge() {
        let mut forward = field("f1", "multipleRecordLinks", Some("t2"));
        forward.inverse_link_field_id = Some("f2".to_string());
        let mut backward = field("f2", "multipleRecordLinks", Some("t1"));
        backward.prefers_single_link = Some(true);

        let tables = vec![table("t1", vec![forward]), table("t2", vec![backward])];
        let edges = derive_relationships(&tables);

        assert_eq!(edges.len(), 2);
        assert_eq!(
            (edges[0].from_table_id.as_str(), edges[0].to_table_id.as_str()),
            ("t1", "t2")
        );
        assert_eq!(
            (edges[1].from_table_id.as_str(), edges[1].to_table_id.as_str()),
            ("t2", "t1")
        );
        assert!(!edges[0].prefers_single_link);
        assert!(edges[1].prefers_single_link);
    }

    #[test]
    fn test_other_relational_types_ignored() {
        let mut lookup = field("f1", "lookup", None);
        lookup.linked_table_id = Some("t2".to_string());
        let tables = vec![
            table("t1", vec![lookup, field("f2", "rollup", None)]),
            table("t2", Vec::new()),
        ];
        assert!(derive_relationships(&tables).is_empty());
    }

    #[test]
    fn test_self_link_yields_edge() {
        let tables = vec![table(
            "t1",
            vec![field("parent", "multipleRecordLinks", Some("t1"))],
        )];
        let edges = derive_relationships(&tables);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to_table_id, "t1");
    }
}
