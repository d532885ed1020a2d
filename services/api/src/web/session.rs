//! services/api/src/web/session.rs
//!
//! Signed session cookies. The cookie carries the `SessionUser` itself:
//! `base64url(json) "." base64url(HMAC-SHA256(key, base64url(json)))`.

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use knowledge_core::domain::SessionUser;
use rand::RngCore;
use sha2::Sha256;
use tracing::{debug, warn};

use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "session";

/// The key used to sign and verify session cookies.
#[derive(Clone)]
pub struct SessionKey(Vec<u8>);

impl SessionKey {
    pub fn new(secret: &[u8]) -> Self {
        Self(secret.to_vec())
    }

    /// Uses the configured secret, or a random key that only lives as long as the process.
    pub fn from_config(secret: Option<&str>) -> Self {
        match secret {
            Some(s) => Self::new(s.as_bytes()),
            None => {
                warn!("SESSION_SECRET is not set. Using a random key; sessions end on restart.");
                let mut key = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut key);
                Self(key)
            }
        }
    }

    fn mac(&self) -> Result<HmacSha256, ApiError> {
        HmacSha256::new_from_slice(&self.0)
            .map_err(|e| ApiError::Internal(format!("HMAC init failed: {}", e)))
    }

    /// Produces the signed cookie value for a user.
    pub fn sign(&self, user: &SessionUser) -> Result<String, ApiError> {
        let json = serde_json::to_vec(user)
            .map_err(|e| ApiError::Internal(format!("Failed to encode session: {}", e)))?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// Returns the user only if the signature matches.
    pub fn verify(&self, value: &str) -> Option<SessionUser> {
        let (payload, signature) = value.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            debug!("Rejected session cookie with a bad signature");
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// Reads and verifies the session cookie from request headers.
    pub fn current_user(&self, headers: &HeaderMap) -> Option<SessionUser> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|h| h.split(';'))
            .find_map(|c| c.trim().strip_prefix("session="))
            .and_then(|value| self.verify(value))
    }
}

/// The `Set-Cookie` value that starts a session.
pub fn session_cookie(value: &str, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/{}",
        SESSION_COOKIE,
        value,
        if secure { "; Secure" } else { "" }
    )
}

/// The `Set-Cookie` value that ends a session.
pub fn cleared_session_cookie(secure: bool) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
        SESSION_COOKIE,
        if secure { "; Secure" } else { "" }
    )
}
