//! services/extractor/src/bin/knowledge_extractor.rs

use std::process::ExitCode;

use clap::Parser;
use extractor_lib::{error::ExtractorError, run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // The .env file has to be loaded before clap reads its `env` fallbacks.
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the result.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();

    match run(cli, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if matches!(e, ExtractorError::Provider(_)) {
                println!("Extraction failed.");
            }
            ExitCode::from(e.exit_code())
        }
    }
}
