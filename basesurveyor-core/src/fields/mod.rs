//! Field-level normalization.
//!
//! Two pure functions sit at the bottom of the pipeline:
//! - **Categorization**: maps a field-type tag to a [`FieldCategory`]
//! - **Option normalization**: maps a raw `(type, options)` pair onto the
//!   closed [`FieldOptions`] variant for that type family
//!
//! Neither depends on the data source; both are total over their input.
//!
//! [`FieldCategory`]: crate::models::FieldCategory
//! [`FieldOptions`]: crate::models::FieldOptions

mod category;
mod options;

pub use category::{categorize, field_types_in};
pub use options::{LinkTarget, NormalizedOptions, OptionError, normalize, try_normalize};
