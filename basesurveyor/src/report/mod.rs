//! Interactive report over a finished schema model.
//!
//! # Module Structure
//! - `navigator`: report states, selections and transitions
//! - `render`: text renderers for each state
//!
//! [`InteractiveReport`] is the [`ReportSink`] used by the `explore`
//! command: it renders the current state, offers a numbered menu, reads one
//! line per choice and writes any requested export to an output directory.

pub mod navigator;
pub mod render;

pub use navigator::{ReportState, Selection, Transition, parse_choice};

use crate::export::{self, ExportFormat};
use async_trait::async_trait;
use basesurveyor_core::{AnalysisConfig, ReportSink, Result, SchemaModel, SurveyorError};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Renders the text shown for a state.
pub fn render_state(state: ReportState, schema: &SchemaModel, config: &AnalysisConfig) -> String {
    match state {
        ReportState::Overview => render::overview(schema, config),
        ReportState::TableDetail(index) => match schema.tables.get(index) {
            Some(table) => render::table_detail(schema, table, config),
            None => render::overview(schema, config),
        },
        ReportState::Relationships => render::relationships(schema, config),
        ReportState::Statistics => render::statistics(schema),
        ReportState::FullSchema => render::full_schema(schema, config),
        ReportState::Export => "## Export\n\nChoose a format.\n".to_string(),
        ReportState::Done => String::new(),
    }
}

/// Menu-driven report reading choices from `input` and writing to `output`.
pub struct InteractiveReport<R, W> {
    input: R,
    output: W,
    export_dir: PathBuf,
    compress: bool,
    exported: Vec<PathBuf>,
}

impl<R: BufRead + Send, W: Write + Send> InteractiveReport<R, W> {
    /// Creates a report writing exports into `export_dir`.
    pub fn new(input: R, output: W, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            input,
            output,
            export_dir: export_dir.into(),
            compress: false,
            exported: Vec::new(),
        }
    }

    /// Compresses exported files with zstd.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Files written during the session, in order.
    pub fn exported(&self) -> &[PathBuf] {
        &self.exported
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(|e| SurveyorError::Io {
                context: "Failed to write report output".to_string(),
                source: e,
            })
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| SurveyorError::Io {
                context: "Failed to read menu choice".to_string(),
                source: e,
            })?;
        Ok((read > 0).then_some(line))
    }

    async fn export(
        &mut self,
        schema: &SchemaModel,
        config: &AnalysisConfig,
        format: ExportFormat,
    ) -> Result<()> {
        let name = export::default_file_name(schema, format, self.compress);
        let path = self.export_dir.join(name);
        match export::save_export(schema, config, format, &path, self.compress).await {
            Ok(path) => {
                self.write_text(&format!("Exported to {}\n", path.display()))?;
                self.exported.push(path);
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.write_text(&format!("Export failed: {}\n", e))?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R: BufRead + Send, W: Write + Send> ReportSink for InteractiveReport<R, W> {
    async fn present(&mut self, schema: &SchemaModel, config: &AnalysisConfig) -> Result<()> {
        let mut state = ReportState::Overview;

        while state != ReportState::Done {
            let menu = state.menu(schema);
            let mut screen = render_state(state, schema, config);
            screen.push('\n');
            for (number, (label, _)) in (1usize..).zip(menu.iter()) {
                screen.push_str(&format!("{}. {}\n", number, label));
            }
            screen.push_str("> ");
            self.write_text(&screen)?;

            let Some(line) = self.read_line()? else {
                tracing::debug!("Input closed, leaving report");
                break;
            };

            let Some(selection) = parse_choice(&line, &menu) else {
                self.write_text(&format!("Invalid choice: {}\n", line.trim()))?;
                continue;
            };

            let transition = state.transition(selection, schema.tables.len());
            if let Some(format) = transition.export {
                self.export(schema, config, format).await?;
            }
            state = transition.next;
        }

        Ok(())
    }
}
