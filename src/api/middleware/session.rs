//! Session extraction and cookie helpers

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::session::{SessionToken, UserSession};

/// Extractor that requires a live session
///
/// The token is read from `Authorization: Bearer <token>` or, failing that,
/// from the session cookie.
#[derive(Debug, Clone)]
pub struct RequireSession {
    pub token: SessionToken,
    pub session: UserSession,
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(&parts.headers, &state.session.cookie_name)
            .ok_or_else(|| ApiError::unauthorized("Login required"))?;

        let session = state
            .session_store
            .get(&token)
            .await?
            .ok_or_else(|| {
                debug!("Rejected unknown or expired session");
                ApiError::unauthorized("Session expired or invalid")
            })?;

        Ok(RequireSession { token, session })
    }
}

/// Find the session token in the request headers
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(SessionToken::new(token));
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| SessionToken::new(value))
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(cookie_name: &str, token: &SessionToken, ttl_minutes: i64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        cookie_name,
        token.as_str(),
        ttl_minutes.max(0) * 60
    )
}

/// `Set-Cookie` value that clears the session cookie
pub fn expired_session_cookie(cookie_name: &str) -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", cookie_name)
}
