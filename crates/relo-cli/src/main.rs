mod cli;
mod commands;
mod error;
mod logging;
mod render;

use std::process::ExitCode;

use clap::Parser;

use relo_runtime::Runtime;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    let runtime = match &cli.config {
        Some(path) => Runtime::with_config_path(path),
        None => Runtime::new(),
    };

    match commands::run(cli.command, runtime).await {
        Ok(code) => code,
        Err(e) => {
            tracing::info!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
