//! Schema introspection pipeline.
//!
//! Data flows one way: a [`BaseSource`](crate::source::BaseSource) is walked
//! table by table into table models, from which the relationship graph and
//! the statistics aggregate are derived. The result is a frozen
//! [`SchemaModel`](crate::models::SchemaModel).
//!
//! # Module Structure
//! - `walker`: per-table traversal with contained failures
//! - `relationships`: link-field edge derivation
//! - `statistics`: totals, distributions and table sizes
//! - `progress`: progress notifications
//! - `builder`: the orchestrating facade

mod builder;
mod progress;
mod relationships;
mod statistics;
mod walker;

pub use builder::SchemaBuilder;
pub use progress::{LogProgress, NoopProgress, ProgressObserver};
pub use relationships::derive_relationships;
pub use statistics::derive_statistics;
pub use walker::{TableWalk, TableWalker};
