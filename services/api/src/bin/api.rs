//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, GeminiAdapter},
    config::Config,
    error::ApiError,
    web::{router, session::SessionKey, state::AppState},
};
use knowledge_core::{ports::TextGenerationService, quiz::QuizGenerator};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Credential Store & Run Migrations ---
    info!("Opening database at {}", config.database_url);
    let db_adapter = DbAdapter::connect(&config.database_url).await?;
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize the Generative Provider ---
    let provider: Option<Arc<dyn TextGenerationService>> = match &config.gemini_api_key {
        Some(key) => {
            info!("Using Gemini model {}", config.gemini_model);
            Some(Arc::new(GeminiAdapter::new(
                reqwest::Client::new(),
                config.gemini_base_url.clone(),
                key.clone(),
                config.gemini_model.clone(),
            )))
        }
        None => {
            warn!("GEMINI_API_KEY is not set. /api/generate will return mock data.");
            None
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store: Arc::new(db_adapter),
        config: config.clone(),
        quiz: QuizGenerator::new(provider),
        session_key: SessionKey::from_config(config.session_secret.as_deref()),
    });

    // --- 5. Create the Web Router ---
    let app = router(app_state);

    // --- 6. Start the Server ---
    info!("Server running on http://{}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
