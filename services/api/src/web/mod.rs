pub mod auth;
pub mod middleware;
pub mod pages;
pub mod rest;
pub mod session;
pub mod state;

pub use middleware::require_auth;
pub use rest::generate_quiz_handler;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    auth::{login_form, login_handler, logout_handler, register_form, register_handler},
    pages::home_handler,
    rest::ApiDoc,
    state::AppState,
};

/// Builds the complete application router.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let page_routes = Router::new()
        .route("/", get(home_handler))
        .route("/login", get(login_form).post(login_handler))
        .route("/register", get(register_form).post(register_handler))
        .route("/logout", get(logout_handler));

    // Protected routes (auth required)
    let api_routes = Router::new()
        .route("/api/generate", post(generate_quiz_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let mut app = Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .with_state(app_state.clone())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(dir) = &app_state.config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
}
