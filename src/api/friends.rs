//! Friend request endpoints

use axum::{extract::State, http::StatusCode, routing::{get, post}, Router};
use serde::{Deserialize, Serialize};

use super::middleware::RequireSession;
use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::{FriendRequest, UserId};

pub fn create_friends_router() -> Router<AppState> {
    Router::new()
        .route("/requests", post(send_friend_request))
        .route("/requests/received", get(list_received))
        .route("/requests/sent", get(list_sent))
}

#[derive(Debug, Deserialize)]
pub struct SendFriendRequest {
    pub receiver_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct FriendRequestListResponse {
    pub data: Vec<FriendRequest>,
}

pub async fn send_friend_request(
    State(state): State<AppState>,
    RequireSession { session, .. }: RequireSession,
    Json(request): Json<SendFriendRequest>,
) -> Result<(StatusCode, Json<FriendRequest>), ApiError> {
    let created = state
        .friend_request_service
        .send(&session, request.receiver_id)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_received(
    State(state): State<AppState>,
    RequireSession { session, .. }: RequireSession,
) -> Result<Json<FriendRequestListResponse>, ApiError> {
    let data = state.friend_request_service.received(&session).await?;
    Ok(Json(FriendRequestListResponse { data }))
}

pub async fn list_sent(
    State(state): State<AppState>,
    RequireSession { session, .. }: RequireSession,
) -> Result<Json<FriendRequestListResponse>, ApiError> {
    let data = state.friend_request_service.sent(&session).await?;
    Ok(Json(FriendRequestListResponse { data }))
}
