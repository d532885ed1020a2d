//! services/extractor/src/lib.rs
//!
//! Command-line knowledge extraction: resolve the text, ask the model for a
//! JSON topic hierarchy (optionally with a quiz), then print and save it.

pub mod adapters;
pub mod error;
pub mod input;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use knowledge_core::{domain::ExtractionMode, extraction::extract_knowledge, ports::PortError};
use tracing::info;

use crate::adapters::OpenAiChatAdapter;
use crate::error::ExtractorError;
use crate::input::{resolve_api_key, resolve_input};

/// Extract structured knowledge from text.
#[derive(Parser, Debug, Clone)]
#[command(name = "knowledge-extractor", version, about, long_about = None)]
pub struct Cli {
    /// Text string or path to a text file.
    pub input: String,

    /// OpenAI API key (optional if OPENAI_API_KEY is set).
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model to use.
    #[arg(long, default_value = "gpt-4o")]
    pub model: String,

    /// Path to save output JSON.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Generate a quiz along with the knowledge extraction.
    #[arg(long)]
    pub quiz: bool,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub api_base: Option<String>,
}

/// Runs one extraction, writing user-facing output to `out`.
///
/// A failure to save the result is returned only after the result has been printed.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<(), ExtractorError> {
    let text = resolve_input(&cli.input)?;
    let mode = ExtractionMode::from_quiz_flag(cli.quiz);

    writeln!(
        out,
        "Extracting knowledge{}",
        if mode.includes_quiz() {
            " and generating quiz..."
        } else {
            "..."
        }
    )
    .map_err(stdout_error)?;

    let api_key = resolve_api_key(cli.api_key.as_deref())?;
    let adapter = OpenAiChatAdapter::new(
        OpenAiChatAdapter::client(&api_key, cli.api_base.as_deref()),
        cli.model.clone(),
    );

    info!("Sending {} characters to {}", text.chars().count(), cli.model);
    let result = extract_knowledge(&adapter, &text, mode).await?;

    let json_output = serde_json::to_string_pretty(&result)
        .map_err(|e| PortError::InvalidResponse(e.to_string()))?;
    writeln!(out, "\n--- Extracted Knowledge ---\n").map_err(stdout_error)?;
    writeln!(out, "{}", json_output).map_err(stdout_error)?;

    if let Some(path) = cli.output {
        std::fs::write(&path, &json_output).map_err(|source| ExtractorError::Output {
            path: path.clone(),
            source,
        })?;
        writeln!(out, "\nResult saved to {}", path.display()).map_err(stdout_error)?;
    }

    Ok(())
}

fn stdout_error(source: std::io::Error) -> ExtractorError {
    ExtractorError::Output {
        path: PathBuf::from("<stdout>"),
        source,
    }
}
