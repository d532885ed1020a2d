//! services/api/src/web/auth.rs
//!
//! Form-based registration, login, and logout.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use knowledge_core::domain::SessionUser;
use knowledge_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::ApiError;
use crate::web::pages::{login_page, register_page};
use crate::web::session::{cleared_session_cookie, session_cookie};
use crate::web::state::AppState;

pub const DUPLICATE_USERNAME: &str = "Username already exists";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MISSING_FIELDS: &str = "Username and password are required";

//=========================================================================================
// Request Types
//=========================================================================================

/// Absent fields deserialize as empty so they get the same 400 page as blank ones.
#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

//=========================================================================================
// Password Hashing
//=========================================================================================

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })
}

pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        ApiError::Internal("Authentication error".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /register
pub async fn register_form() -> Response {
    register_page(None).into_response()
}

/// POST /register - Create a new account, then send the user to the login page.
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    if form.username.trim().is_empty() || form.password.is_empty() {
        return Ok((StatusCode::BAD_REQUEST, register_page(Some(MISSING_FIELDS))).into_response());
    }

    let password_hash = hash_password(&form.password)?;

    match state.store.create_user(&form.username, &password_hash).await {
        Ok(user) => {
            info!("Registered user {} ({})", user.username, user.id);
            Ok(Redirect::to("/login").into_response())
        }
        Err(PortError::Conflict(_)) => {
            Ok((StatusCode::CONFLICT, register_page(Some(DUPLICATE_USERNAME))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_form() -> Response {
    login_page(None).into_response()
}

/// POST /login - Verify the password and start a signed-cookie session.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let invalid =
        || (StatusCode::UNAUTHORIZED, login_page(Some(INVALID_CREDENTIALS))).into_response();

    let credential = match state.store.get_user_by_username(&form.username).await {
        Ok(c) => c,
        Err(PortError::NotFound(_)) => return Ok(invalid()),
        Err(e) => return Err(e.into()),
    };

    if !verify_password(&form.password, &credential.password_hash)? {
        info!("Failed login for {}", credential.username);
        return Ok(invalid());
    }

    let session = SessionUser {
        user_id: credential.id,
        username: credential.username,
    };
    let cookie = session_cookie(
        &state.session_key.sign(&session)?,
        state.config.cookie_secure,
    );
    info!("User {} logged in", session.username);

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// GET /logout - Clear the session cookie.
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Response {
    let cookie = cleared_session_cookie(state.config.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_salted_and_verifiable() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
        assert_ne!(first, "hunter2");
        assert!(verify_password("hunter2", &first).unwrap());
        assert!(!verify_password("hunter3", &first).unwrap());
    }
}
