mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing_stderr();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

/// Logs go to stderr so stdout carries only the envelope.
fn init_tracing_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let request_id = Uuid::new_v4();
    let span = info_span!("operation", %request_id, command = cli.command.name());
    let response = commands::run(&cli).instrument(span).await?;

    output::render(&response, cli.pretty)?;

    if response.is_error {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
