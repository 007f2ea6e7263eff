use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use transcoder_preset::cli::{run, Cli};
use transcoder_preset::report::{render_failure, render_outcome};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout is reserved for the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(outcome) => match render_outcome(&outcome) {
            Ok(json) => {
                println!("{json}");
                tracing::info!("CLI completed successfully");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to render result");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "CLI exited with error");
            println!("{}", render_failure(&e));
            ExitCode::FAILURE
        }
    }
}
