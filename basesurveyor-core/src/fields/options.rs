//! Normalization of raw field options into [`FieldOptions`].
//!
//! The source exposes options as an opaque JSON value whose shape depends on
//! the field type. Normalization copies only the keys each type family
//! needs and drops the rest. A key that is present but has the wrong JSON
//! type is an [`OptionError`]; [`normalize`] degrades that to empty options,
//! while [`try_normalize`] returns it so callers can record the failure.

use crate::models::{FieldOptions, SelectChoice};
use serde_json::{Map, Value};
use thiserror::Error;

const DEFAULT_CHOICE_ID: &str = "unknown";
const DEFAULT_CHOICE_NAME: &str = "Unnamed";
const DEFAULT_CHOICE_COLOR: &str = "default";

/// Link metadata of a `multipleRecordLinks` field.
///
/// Attached to the field model directly rather than nested in its options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkTarget {
    /// Table the field links to
    pub linked_table_id: Option<String>,
    /// Field on the linked table that links back
    pub inverse_link_field_id: Option<String>,
    /// Whether the field is limited to one linked record
    pub prefers_single_record_link: bool,
}

/// Output of option normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedOptions {
    /// Canonical options for the field type
    pub options: FieldOptions,
    /// Link metadata, for `multipleRecordLinks` only
    pub link: Option<LinkTarget>,
}

/// Raw options could not be mapped onto their type family.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("options must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("option '{key}' must be {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Normalizes raw options, degrading any failure to empty options.
///
/// Never fails. Absent options yield an empty record for every type.
///
/// # Example
/// ```rust
/// use basesurveyor_core::fields::normalize;
/// use basesurveyor_core::models::FieldOptions;
/// use serde_json::json;
///
/// let raw = json!({"precision": 2, "symbol": "$", "format": "ignored"});
/// let normalized = normalize("currency", Some(&raw));
/// assert_eq!(
///     normalized.options,
///     FieldOptions::Numeric { precision: Some(2), symbol: Some("$".to_string()) }
/// );
/// ```
pub fn normalize(field_type: &str, raw: Option<&Value>) -> NormalizedOptions {
    try_normalize(field_type, raw).unwrap_or_else(|e| {
        tracing::warn!(
            "Discarding options of '{}' field: {}",
            field_type,
            e
        );
        NormalizedOptions::default()
    })
}

/// Normalizes raw options, reporting malformed keys as errors.
pub fn try_normalize(
    field_type: &str,
    raw: Option<&Value>,
) -> Result<NormalizedOptions, OptionError> {
    let Some(family) = Family::of(field_type) else {
        return Ok(NormalizedOptions::default());
    };

    let map = match raw {
        None | Some(Value::Null) => return Ok(NormalizedOptions::default()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(OptionError::NotAnObject {
                found: json_kind(other),
            });
        }
    };

    let options = match family {
        Family::Select => FieldOptions::Select {
            choices: extract_choices(map)?,
        },
        Family::Numeric { with_symbol } => FieldOptions::Numeric {
            precision: opt_u32(map, "precision")?,
            symbol: if with_symbol {
                opt_string(map, "symbol")?
            } else {
                None
            },
        },
        Family::Date { with_time } => {
            let (time_format, time_zone) = if with_time {
                (opt_value(map, "timeFormat"), opt_string(map, "timeZone")?)
            } else {
                (None, None)
            };
            FieldOptions::Date {
                date_format: opt_value(map, "dateFormat"),
                time_format,
                time_zone,
            }
        }
        Family::Checkbox => FieldOptions::Checkbox {
            icon: opt_string(map, "icon")?,
            color: opt_string(map, "color")?,
        },
        Family::Rating => FieldOptions::Rating {
            icon: opt_string(map, "icon")?,
            max: opt_u32(map, "max")?,
            color: opt_string(map, "color")?,
        },
        Family::Lookup => FieldOptions::Lookup {
            record_link_field_id: opt_string(map, "recordLinkFieldId")?,
            field_id_in_linked_table: opt_string(map, "fieldIdInLinkedTable")?,
        },
        Family::Rollup => FieldOptions::Rollup {
            record_link_field_id: opt_string(map, "recordLinkFieldId")?,
            field_id_in_linked_table: opt_string(map, "fieldIdInLinkedTable")?,
            referenced_field_ids: opt_string_list(map, "referencedFieldIds")?,
        },
        Family::Count => FieldOptions::Count {
            record_link_field_id: opt_string(map, "recordLinkFieldId")?,
        },
        Family::Formula => FieldOptions::Formula {
            is_valid: opt_bool(map, "isValid")?,
        },
        Family::Link => {
            let link = LinkTarget {
                linked_table_id: opt_string(map, "linkedTableId")?,
                inverse_link_field_id: opt_string(map, "inverseLinkFieldId")?,
                prefers_single_record_link: opt_bool(map, "prefersSingleRecordLink")?
                    .unwrap_or(false),
            };
            return Ok(NormalizedOptions {
                options: FieldOptions::Empty,
                link: Some(link),
            });
        }
    };

    Ok(NormalizedOptions {
        options,
        link: None,
    })
}

/// Field-type families with a known option shape
#[derive(Debug, Clone, Copy)]
enum Family {
    Select,
    Numeric { with_symbol: bool },
    Date { with_time: bool },
    Checkbox,
    Rating,
    Lookup,
    Rollup,
    Count,
    Formula,
    Link,
}

impl Family {
    fn of(field_type: &str) -> Option<Self> {
        let family = match field_type {
            "singleSelect" | "multipleSelects" => Family::Select,
            "number" | "percent" => Family::Numeric { with_symbol: false },
            "currency" => Family::Numeric { with_symbol: true },
            "date" => Family::Date { with_time: false },
            "dateTime" => Family::Date { with_time: true },
            "checkbox" => Family::Checkbox,
            "rating" => Family::Rating,
            "lookup" => Family::Lookup,
            "rollup" => Family::Rollup,
            "count" => Family::Count,
            "formula" => Family::Formula,
            "multipleRecordLinks" => Family::Link,
            _ => return None,
        };
        Some(family)
    }
}

fn extract_choices(map: &Map<String, Value>) -> Result<Vec<SelectChoice>, OptionError> {
    let items = match map.get("choices") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(wrong_type("choices", "an array", other)),
    };

    items
        .iter()
        .map(|item| -> Result<SelectChoice, OptionError> {
            let choice = item
                .as_object()
                .ok_or_else(|| wrong_type("choices[]", "an object", item))?;
            Ok(SelectChoice {
                id: choice_attr(choice, "id", DEFAULT_CHOICE_ID)?,
                name: choice_attr(choice, "name", DEFAULT_CHOICE_NAME)?,
                color: choice_attr(choice, "color", DEFAULT_CHOICE_COLOR)?,
            })
        })
        .collect()
}

/// Choice attributes fall back to their default when absent or empty.
fn choice_attr(
    choice: &Map<String, Value>,
    key: &str,
    default: &str,
) -> Result<String, OptionError> {
    Ok(opt_string(choice, key)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string()))
}

fn opt_value(map: &Map<String, Value>, key: &str) -> Option<Value> {
    map.get(key).filter(|v| !v.is_null()).cloned()
}

fn opt_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>, OptionError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(key, "a string", other)),
    }
}

fn opt_bool(map: &Map<String, Value>, key: &str) -> Result<Option<bool>, OptionError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(wrong_type(key, "a boolean", other)),
    }
}

fn opt_u32(map: &Map<String, Value>, key: &str) -> Result<Option<u32>, OptionError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| wrong_type(key, "a non-negative integer", value)),
    }
}

fn opt_string_list(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<String>>, OptionError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type(key, "an array of strings", item))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(wrong_type(key, "an array of strings", other)),
    }
}

fn wrong_type(key: &str, expected: &'static str, found: &Value) -> OptionError {
    OptionError::WrongType {
        key: key.to_string(),
        expected,
        found: json_kind(found),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
