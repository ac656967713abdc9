//! BaseSurveyor report and export tool.
//!
//! Builds a schema model from a base snapshot with `basesurveyor-core`, then
//! presents it either as a single rendered view, an export file, or an
//! interactive menu-driven report.
//!
//! # Module Structure
//! - `cli`: argument parsing and command dispatch
//! - `export`: JSON, Markdown and CSV encodings
//! - `report`: text renderers and the interactive report state machine

pub mod cli;
pub mod export;
pub mod report;
