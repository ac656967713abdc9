//! Report navigation as an explicit state machine.
//!
//! Every user choice is a discrete [`Selection`]. [`ReportState::transition`]
//! maps the current state and a selection to the next state, plus an export
//! request when the selection asks for one. Selections that make no sense in
//! the current state leave it unchanged.

use crate::export::ExportFormat;
use basesurveyor_core::SchemaModel;

/// Report screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportState {
    /// Base summary and main menu
    #[default]
    Overview,
    /// One table, by position in the model
    TableDetail(usize),
    Relationships,
    Statistics,
    FullSchema,
    /// Export format picker
    Export,
    /// Terminal state
    Done,
}

/// A discrete user choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    ShowTable(usize),
    ShowRelationships,
    ShowStatistics,
    ShowFullSchema,
    OpenExport,
    Export(ExportFormat),
    Back,
    Quit,
}

/// Outcome of one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State after the selection
    pub next: ReportState,
    /// Export requested by the selection
    pub export: Option<ExportFormat>,
}

impl Transition {
    fn to(next: ReportState) -> Self {
        Self { next, export: None }
    }
}

impl ReportState {
    /// Applies a selection.
    ///
    /// `table_count` bounds [`Selection::ShowTable`]; an out-of-range index
    /// is rejected like any other invalid selection.
    pub fn transition(self, selection: Selection, table_count: usize) -> Transition {
        use ReportState as S;
        use Selection as Sel;

        match (self, selection) {
            (S::Done, _) => Transition::to(S::Done),
            (_, Sel::Quit) => Transition::to(S::Done),

            (S::Overview, Sel::ShowTable(index)) if index < table_count => {
                Transition::to(S::TableDetail(index))
            }
            (S::Overview, Sel::ShowRelationships) => Transition::to(S::Relationships),
            (S::Overview, Sel::ShowStatistics) => Transition::to(S::Statistics),
            (S::Overview, Sel::ShowFullSchema) => Transition::to(S::FullSchema),
            (S::Overview, Sel::OpenExport) => Transition::to(S::Export),

            (S::Export, Sel::Export(format)) => Transition {
                next: S::Overview,
                export: Some(format),
            },

            (
                S::TableDetail(_) | S::Relationships | S::Statistics | S::FullSchema | S::Export,
                Sel::Back,
            ) => Transition::to(S::Overview),

            (state, _) => {
                tracing::debug!("Ignoring {:?} in state {:?}", selection, state);
                Transition::to(state)
            }
        }
    }

    /// Numbered menu entries offered in this state.
    ///
    /// Every listed selection is valid for this state.
    pub fn menu(self, schema: &SchemaModel) -> Vec<(String, Selection)> {
        match self {
            ReportState::Overview => {
                let mut entries: Vec<(String, Selection)> = schema
                    .tables
                    .iter()
                    .enumerate()
                    .map(|(index, table)| {
                        (format!("Table: {}", table.name), Selection::ShowTable(index))
                    })
                    .collect();
                entries.extend([
                    ("Relationships".to_string(), Selection::ShowRelationships),
                    ("Statistics".to_string(), Selection::ShowStatistics),
                    ("Full schema".to_string(), Selection::ShowFullSchema),
                    ("Export".to_string(), Selection::OpenExport),
                    ("Quit".to_string(), Selection::Quit),
                ]);
                entries
            }
            ReportState::Export => {
                let mut entries: Vec<(String, Selection)> = ExportFormat::ALL
                    .iter()
                    .map(|format| (format.label().to_string(), Selection::Export(*format)))
                    .collect();
                entries.push(("Back".to_string(), Selection::Back));
                entries
            }
            ReportState::Done => Vec::new(),
            ReportState::TableDetail(_)
            | ReportState::Relationships
            | ReportState::Statistics
            | ReportState::FullSchema => vec![
                ("Back to overview".to_string(), Selection::Back),
                ("Quit".to_string(), Selection::Quit),
            ],
        }
    }
}

/// Resolves a 1-based menu choice typed by the user.
pub fn parse_choice(input: &str, menu: &[(String, Selection)]) -> Option<Selection> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("q") {
        return Some(Selection::Quit);
    }
    let number: usize = trimmed.parse().ok()?;
    let index = number.checked_sub(1)?;
    menu.get(index).map(|(_, selection)| *selection)
}
