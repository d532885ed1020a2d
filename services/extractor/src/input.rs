//! services/extractor/src/input.rs
//!
//! Resolves the subject text and the API key.

use std::path::Path;

use tracing::debug;

use crate::error::ExtractorError;

pub const MISSING_API_KEY: &str =
    "OpenAI API key not found. Set OPENAI_API_KEY env var or pass --api-key.";

/// If `input` names an existing file its contents are the text; otherwise `input` is.
pub fn resolve_input(input: &str) -> Result<String, ExtractorError> {
    let path = Path::new(input);
    let text = if path.is_file() {
        debug!("Reading input from file {}", path.display());
        std::fs::read_to_string(path)
            .map_err(|e| ExtractorError::Input(format!("could not read input file: {}", e)))?
    } else {
        input.to_string()
    };

    if text.trim().is_empty() {
        return Err(ExtractorError::Input("Input text is empty.".to_string()));
    }
    Ok(text)
}

/// The key from `--api-key`, which clap already falls back to `OPENAI_API_KEY` for.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String, ExtractorError> {
    explicit
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ExtractorError::Config(MISSING_API_KEY.to_string()))
}
