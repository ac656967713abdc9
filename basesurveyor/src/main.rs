//! BaseSurveyor command-line entry point.

use basesurveyor::cli::{self, Cli};
use basesurveyor_core::logging::{LogFormat, init_logging_with_format};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = if cli.global.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    if let Err(e) = init_logging_with_format(cli.global.verbose, cli.global.quiet, format) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = basesurveyor_core::initialize_schema_validator() {
        tracing::warn!("Output validation unavailable: {}", e);
    }

    match cli::run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
