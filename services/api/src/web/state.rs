//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::web::session::SessionKey;
use knowledge_core::ports::CredentialStore;
use knowledge_core::quiz::QuizGenerator;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub config: Arc<Config>,
    pub quiz: QuizGenerator,
    pub session_key: SessionKey,
}
