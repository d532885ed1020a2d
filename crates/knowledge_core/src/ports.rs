//! crates/knowledge_core/src/ports.rs
//!
//! Defines the service contracts (traits) the programs depend on.
//! These traits keep the core independent of specific implementations like
//! the SQLite store or a particular LLM vendor.

use async_trait::async_trait;

use crate::domain::{Credential, SamplingConfig};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new user. Fails with `PortError::Conflict` when the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<Credential>;

    /// Fails with `PortError::NotFound` when no such user exists.
    async fn get_user_by_username(&self, username: &str) -> PortResult<Credential>;
}

#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Sends a system and a user message and returns the raw content of the
    /// first choice. The provider is asked to answer with a JSON object.
    async fn complete_json(&self, system: &str, user: &str) -> PortResult<String>;
}

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Generates free-form text for a single prompt.
    async fn generate_text(&self, prompt: &str, sampling: &SamplingConfig) -> PortResult<String>;
}
