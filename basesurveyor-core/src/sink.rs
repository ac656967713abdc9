//! Consumer contract for finished schema models.

use crate::config::AnalysisConfig;
use crate::models::SchemaModel;
use crate::Result;
use async_trait::async_trait;

/// Receives a finished, read-only [`SchemaModel`] for display or export.
///
/// The model is frozen before it reaches a sink; sinks must not expect to
/// observe a partially built model.
#[async_trait]
pub trait ReportSink: Send {
    /// Presents the model.
    ///
    /// `config` is the configuration the model was built with, so that
    /// presentation choices such as showing field ids stay consistent.
    ///
    /// # Errors
    /// Returns an error if presenting or exporting fails.
    async fn present(&mut self, schema: &SchemaModel, config: &AnalysisConfig) -> Result<()>;
}
