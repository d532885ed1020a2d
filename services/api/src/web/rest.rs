//! services/api/src/web/rest.rs
//!
//! Contains the Axum handler for the quiz generation endpoint and the master
//! definition for the OpenAPI specification.

use crate::{error::ApiError, web::state::AppState};
use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    Extension,
};
use knowledge_core::{
    domain::{MockNotice, SessionUser},
    quiz::QuizOutcome,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_quiz_handler,
    ),
    components(
        schemas(GenerateRequest, MockNotice)
    ),
    tags(
        (name = "Quiz API", description = "Quiz generation for signed-in users.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Payload Structs
//=========================================================================================

/// The text to build a quiz from. A missing field counts as empty text.
#[derive(Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a quiz from the submitted text.
///
/// Text under 50 characters yields `{"questions": []}`. Without a configured
/// provider key the response is a mock notice `{"mock": true, "message": ...}`.
/// Otherwise the model's JSON reply is returned as parsed, usually
/// `{"concepts": [...], "questions": [{"id", "text", "options", "answerIdx", "difficulty", "validationNote"}]}`.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated quiz, an empty question list, or a mock notice", body = serde_json::Value),
        (status = 401, description = "No active session"),
        (status = 500, description = "Provider call or response parsing failed")
    )
)]
pub async fn generate_quiz_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<GenerateRequest>,
) -> Result<Response, ApiError> {
    info!(
        "Quiz requested by {} ({} chars)",
        user.username,
        req.text.chars().count()
    );

    let response = match state.quiz.generate(&req.text).await? {
        QuizOutcome::TooShort => Json(json!({ "questions": [] })).into_response(),
        QuizOutcome::Mock(notice) => Json(notice).into_response(),
        QuizOutcome::Generated(quiz) => {
            let count = quiz
                .get("questions")
                .and_then(|q| q.as_array())
                .map_or(0, |q| q.len());
            info!("Generated {} question(s)", count);
            Json(quiz).into_response()
        }
    };
    Ok(response)
}
