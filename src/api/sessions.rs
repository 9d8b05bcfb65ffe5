//! Login and logout

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::middleware::{expired_session_cookie, session_cookie, RequireSession};
use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::{DomainError, UserId};

pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Also usable as `Authorization: Bearer <token>`
    pub token: String,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    // Wrong credentials answer 401
    let session = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await
        .map_err(|e| match e {
            DomainError::Unauthorized { message } => ApiError::unauthorized(message),
            other => ApiError::from(other),
        })?;

    let token = state.session_store.create(session.clone()).await?;
    info!(user_id = %session.user_id(), "User logged in");

    let cookie = session_cookie(&state.session.cookie_name, &token, state.session.ttl_minutes);
    let body = LoginResponse {
        token: token.as_str().to_string(),
        user_id: session.user_id(),
        name: session.name().to_string(),
        email: session.email().to_string(),
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    RequireSession { token, .. }: RequireSession,
) -> Result<Response, ApiError> {
    state.session_store.remove(&token).await?;

    let cookie = expired_session_cookie(&state.session.cookie_name);
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}
