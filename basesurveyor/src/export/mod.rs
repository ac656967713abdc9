//! Export encodings and file output.
//!
//! # Module Structure
//! - `json`: validated structured-data export
//! - `markdown`: human-readable document rendered from a template
//! - `csv`: one row per field
//!
//! Encoders are pure; [`save_export`] writes the encoded document with
//! optional zstd compression.

mod csv;
mod json;
mod markdown;

pub use self::csv::encode_csv;
pub use self::json::encode_json;
pub use self::markdown::encode_markdown;

use basesurveyor_core::{AnalysisConfig, Result, SchemaModel, SurveyorError};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Available export encodings
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON structured output
    Json,
    /// Markdown documentation
    Markdown,
    /// CSV field inventory
    Csv,
}

impl ExportFormat {
    /// All formats in menu order.
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Markdown, ExportFormat::Csv];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Csv => "csv",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON (structured data)",
            ExportFormat::Markdown => "Markdown (document)",
            ExportFormat::Csv => "CSV (field inventory)",
        }
    }
}

/// Encodes the model in the requested format.
///
/// # Errors
/// Returns an error if serialization, validation or rendering fails.
pub fn encode(schema: &SchemaModel, config: &AnalysisConfig, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => encode_json(schema),
        ExportFormat::Markdown => encode_markdown(schema, config),
        ExportFormat::Csv => encode_csv(schema, config),
    }
}

/// Builds a file name from the base name, e.g. `project-tracker.schema.md`.
pub fn default_file_name(schema: &SchemaModel, format: ExportFormat, compress: bool) -> String {
    let stem = slug(&schema.base_name);
    let stem = if stem.is_empty() {
        slug(&schema.base_id)
    } else {
        stem
    };
    let mut name = format!("{}.schema.{}", stem, format.extension());
    if compress {
        name.push_str(".zst");
    }
    name
}

fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Encodes the model and writes it to `output_path`.
///
/// With `compress`, the document is zstd-compressed, which requires the
/// `compression` feature.
///
/// # Errors
/// Returns an error if encoding, compression or writing fails.
pub async fn save_export(
    schema: &SchemaModel,
    config: &AnalysisConfig,
    format: ExportFormat,
    output_path: &Path,
    compress: bool,
) -> Result<PathBuf> {
    let document = encode(schema, config, format)?;

    if compress {
        #[cfg(feature = "compression")]
        {
            save_compressed(&document, output_path).await?;
        }
        #[cfg(not(feature = "compression"))]
        {
            return Err(SurveyorError::configuration(
                "Compression not available. Compile with --features compression",
            ));
        }
    } else {
        save_document(&document, output_path).await?;
    }

    tracing::info!("Wrote {:?} export to {}", format, output_path.display());
    Ok(output_path.to_path_buf())
}

/// Saves a document to file.
pub async fn save_document(document: &str, output_path: &Path) -> Result<()> {
    tokio::fs::write(output_path, document)
        .await
        .map_err(|e| SurveyorError::Io {
            context: format!("Failed to write to {}", output_path.display()),
            source: e,
        })
}

/// Saves a zstd-compressed document.
#[cfg(feature = "compression")]
async fn save_compressed(document: &str, output_path: &Path) -> Result<()> {
    use std::io::Write;

    let mut encoder = zstd::Encoder::new(Vec::new(), 3).map_err(|e| {
        SurveyorError::configuration(format!("Failed to create compressor: {}", e))
    })?;

    encoder
        .write_all(document.as_bytes())
        .map_err(|e| SurveyorError::configuration(format!("Compression failed: {}", e)))?;

    let compressed = encoder.finish().map_err(|e| {
        SurveyorError::configuration(format!("Compression finalization failed: {}", e))
    })?;

    tokio::fs::write(output_path, compressed)
        .await
        .map_err(|e| SurveyorError::Io {
            context: format!(
                "Failed to write compressed file to {}",
                output_path.display()
            ),
            source: e,
        })
}
