//! Command-line interface.
//!
//! Analysis settings are resolved once from flags or `BASESURVEYOR_*`
//! environment variables before the pipeline runs.

use crate::export::{self, ExportFormat};
use crate::report::{InteractiveReport, ReportState, render_state};
use anyhow::{Context, bail};
use basesurveyor_core::{AnalysisConfig, ReportSink, SchemaBuilder, SchemaModel, SnapshotBase};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "basesurveyor")]
#[command(about = "Base schema introspection and report tool")]
#[command(version)]
#[command(long_about = "
BaseSurveyor - Offline schema reports for multi-table bases

Reads a JSON snapshot of a base's metadata and builds a model of its tables,
fields, views and link fields, including a relationship graph and aggregate
statistics.

EXAMPLES:
  basesurveyor analyze base.json
  basesurveyor analyze base.json --view statistics
  basesurveyor analyze base.json --format markdown --output schema.md
  basesurveyor --include-field-ids explore base.json --export-dir reports/
")]
pub struct Cli {
    /// Logging flags
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Analysis settings
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one report view or write an export
    Analyze(AnalyzeArgs),
    /// Browse the report through numbered menus
    Explore(ExploreArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Base snapshot file (.json, or .json.zst with compression)
    #[arg(help = "Base snapshot file")]
    pub input: PathBuf,

    /// Report view to print
    #[arg(long, value_enum, default_value = "overview")]
    pub view: ViewArg,

    /// Table to show, by id or name (implies the table view)
    #[arg(long)]
    pub table: Option<String>,

    /// Export format instead of a report view
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Export file path (stdout when omitted)
    #[arg(short, long, requires = "format")]
    pub output: Option<PathBuf>,

    /// Compress the export using Zstandard
    #[arg(long, requires = "output")]
    pub compress: bool,
}

#[derive(Args, Debug)]
pub struct ExploreArgs {
    /// Base snapshot file
    #[arg(help = "Base snapshot file")]
    pub input: PathBuf,

    /// Directory receiving exports
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Compress exports using Zstandard
    #[arg(long)]
    pub compress: bool,
}

/// Report views printable by `analyze`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewArg {
    Overview,
    Relationships,
    Statistics,
    Full,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "BASESURVEYOR_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Args, Debug)]
pub struct AnalysisArgs {
    /// Sample records kept per table
    #[arg(
        long,
        global = true,
        default_value_t = 5,
        env = "BASESURVEYOR_MAX_SAMPLE_RECORDS",
        help = "Number of sample records to keep per table"
    )]
    pub max_sample_records: usize,

    /// Show field, table and record ids in reports
    #[arg(long, global = true, env = "BASESURVEYOR_INCLUDE_FIELD_IDS")]
    pub include_field_ids: bool,

    /// Skip relationship derivation
    #[arg(long, global = true, env = "BASESURVEYOR_NO_RELATIONSHIPS")]
    pub no_relationships: bool,

    /// Skip statistics derivation
    #[arg(long, global = true, env = "BASESURVEYOR_NO_STATISTICS")]
    pub no_statistics: bool,
}

impl AnalysisArgs {
    /// Resolves the analysis configuration.
    pub fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig::new()
            .with_max_sample_records(self.max_sample_records)
            .with_field_ids(self.include_field_ids)
            .with_relationships(!self.no_relationships)
            .with_statistics(!self.no_statistics)
    }
}

/// Runs a parsed command line.
///
/// # Errors
/// Returns an error if the snapshot cannot be loaded, analysis is fatal,
/// or writing output fails.
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.analysis.to_config();

    match &cli.command {
        Command::Analyze(args) => {
            let schema = analyze_snapshot(&args.input, &config).await?;
            run_analyze(&schema, &config, args, &mut std::io::stdout()).await
        }
        Command::Explore(args) => {
            let schema = analyze_snapshot(&args.input, &config).await?;
            let stdin = std::io::BufReader::new(std::io::stdin());
            let mut report = InteractiveReport::new(stdin, std::io::stdout(), &args.export_dir)
                .with_compression(args.compress);
            report.present(&schema, &config).await?;
            info!("Report closed after {} exports", report.exported().len());
            Ok(())
        }
    }
}

/// Loads a snapshot and builds its schema model.
///
/// # Errors
/// Returns an error if loading fails or analysis is fatal.
pub async fn analyze_snapshot(input: &Path, config: &AnalysisConfig) -> anyhow::Result<SchemaModel> {
    info!("Loading snapshot {}", input.display());
    let base = SnapshotBase::load(input).await?;

    let schema = SchemaBuilder::new(config.clone()).build(&base).await?;
    info!(
        "Analyzed {} tables, {} fields, {} relationships",
        schema.tables.len(),
        schema.field_count(),
        schema.relationships.len()
    );
    Ok(schema)
}

/// Executes `analyze` against an already built model.
///
/// # Errors
/// Returns an error for an unknown table or failed export.
pub async fn run_analyze(
    schema: &SchemaModel,
    config: &AnalysisConfig,
    args: &AnalyzeArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if let Some(format) = args.format {
        match &args.output {
            Some(path) => {
                let path = export::save_export(schema, config, format, path, args.compress).await?;
                writeln!(out, "Exported to {}", path.display())?;
            }
            None => {
                let document = export::encode(schema, config, format)?;
                out.write_all(document.as_bytes())?;
            }
        }
        return Ok(());
    }

    let state = match &args.table {
        Some(wanted) => {
            let Some(index) = find_table(schema, wanted) else {
                bail!("No table with id or name '{}'", wanted);
            };
            ReportState::TableDetail(index)
        }
        None => match args.view {
            ViewArg::Overview => ReportState::Overview,
            ViewArg::Relationships => ReportState::Relationships,
            ViewArg::Statistics => ReportState::Statistics,
            ViewArg::Full => ReportState::FullSchema,
        },
    };

    out.write_all(render_state(state, schema, config).as_bytes())
        .context("Failed to write report")?;
    Ok(())
}

/// Finds a table by exact id, then by case-insensitive name.
fn find_table(schema: &SchemaModel, wanted: &str) -> Option<usize> {
    schema
        .tables
        .iter()
        .position(|t| t.id == wanted)
        .or_else(|| {
            schema
                .tables
                .iter()
                .position(|t| t.name.eq_ignore_ascii_case(wanted))
        })
}
