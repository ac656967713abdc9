//! Field-type tag to semantic category mapping.

use crate::models::FieldCategory;

/// Known field types, grouped by category. Anything not listed is OTHER.
const CATEGORY_TABLE: &[(FieldCategory, &[&str])] = &[
    (
        FieldCategory::Text,
        &[
            "singleLineText",
            "multilineText",
            "richText",
            "email",
            "url",
            "phoneNumber",
        ],
    ),
    (
        FieldCategory::Numeric,
        &["number", "percent", "currency", "rating", "duration"],
    ),
    (
        FieldCategory::Date,
        &["date", "dateTime", "createdTime", "lastModifiedTime"],
    ),
    (FieldCategory::Select, &["singleSelect", "multipleSelects"]),
    (
        FieldCategory::Relational,
        &["multipleRecordLinks", "lookup", "rollup", "count"],
    ),
    (FieldCategory::Attachment, &["multipleAttachments"]),
    (FieldCategory::Checkbox, &["checkbox"]),
    (
        FieldCategory::User,
        &[
            "singleCollaborator",
            "multipleCollaborators",
            "createdBy",
            "lastModifiedBy",
        ],
    ),
    (
        FieldCategory::Computed,
        &["formula", "autoNumber", "button", "aiText"],
    ),
];

/// Maps a field-type tag to its semantic category.
///
/// This is a total function: unknown or empty tags map to
/// [`FieldCategory::Other`]. Matching is exact and case-sensitive.
///
/// # Example
/// ```rust
/// use basesurveyor_core::fields::categorize;
/// use basesurveyor_core::models::FieldCategory;
///
/// assert_eq!(categorize("rollup"), FieldCategory::Relational);
/// assert_eq!(categorize("barcode"), FieldCategory::Other);
/// ```
pub fn categorize(field_type: &str) -> FieldCategory {
    CATEGORY_TABLE
        .iter()
        .find(|(_, types)| types.contains(&field_type))
        .map_or(FieldCategory::Other, |(category, _)| *category)
}

/// Lists the field types explicitly assigned to a category.
///
/// OTHER has no explicit members and returns an empty slice.
pub fn field_types_in(category: FieldCategory) -> &'static [&'static str] {
    match CATEGORY_TABLE.iter().find(|(c, _)| *c == category) {
        Some((_, types)) => *types,
        None => &[],
    }
}
