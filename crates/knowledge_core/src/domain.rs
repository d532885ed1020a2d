//! crates/knowledge_core/src/domain.rs
//!
//! Defines the core data structures shared by the extractor CLI and the quiz server.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Credentials and Sessions
//=========================================================================================

/// A stored credential row. Only ever read for login.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// The identity carried in a browser session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
}

//=========================================================================================
// Knowledge Extraction
//=========================================================================================

/// Whether the extractor should also ask the model for a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    Concepts,
    ConceptsWithQuiz,
}

impl ExtractionMode {
    pub fn from_quiz_flag(quiz: bool) -> Self {
        if quiz {
            Self::ConceptsWithQuiz
        } else {
            Self::Concepts
        }
    }

    pub fn includes_quiz(self) -> bool {
        matches!(self, Self::ConceptsWithQuiz)
    }
}

//=========================================================================================
// Quiz Generation
//=========================================================================================

/// Returned instead of a quiz when no generative provider is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MockNotice {
    pub mock: bool,
    pub message: String,
}

impl MockNotice {
    pub const MESSAGE: &'static str = "Please set GEMINI_API_KEY to get real AI results.";

    pub fn unconfigured() -> Self {
        Self {
            mock: true,
            message: Self::MESSAGE.to_string(),
        }
    }
}

/// Sampling parameters for a generative-text request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl SamplingConfig {
    /// High-temperature settings used for quiz generation.
    pub const fn creative() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}
