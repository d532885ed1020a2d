//! services/extractor/src/error.rs
//!
//! Defines the error type for the extractor CLI and the exit code of each failure.

use knowledge_core::ports::PortError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    /// No API key, or an unusable setting.
    #[error("{0}")]
    Config(String),

    /// Unreadable input file or empty text.
    #[error("{0}")]
    Input(String),

    /// The provider call failed or returned something that is not JSON.
    #[error("LLM call failed: {0}")]
    Provider(#[from] PortError),

    /// The result was printed but could not be saved.
    #[error("could not save output to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractorError {
    /// `2` for provider failures; `1` for everything that is wrong locally.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExtractorError::Provider(_) => 2,
            ExtractorError::Config(_) | ExtractorError::Input(_) | ExtractorError::Output { .. } => 1,
        }
    }
}
