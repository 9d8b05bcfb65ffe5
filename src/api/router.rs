use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::friends::create_friends_router;
use super::health;
use super::middleware::{logging_middleware, security_headers_middleware, upload_body_limit};
use super::sessions::create_session_router;
use super::state::AppState;
use super::users::create_users_router;

/// Create the full router with application state
///
/// Stored uploads are served under the configured public prefix.
pub fn create_router_with_state(state: AppState) -> Router {
    let body_limit = upload_body_limit(state.upload.max_size_bytes);
    let upload_prefix = state.upload.public_prefix.trim_end_matches('/').to_string();

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(create_session_router())
        .nest(
            "/users",
            create_users_router().layer(DefaultBodyLimit::max(body_limit)),
        )
        .nest("/friends", create_friends_router());

    if upload_prefix.is_empty() {
        warn!("Upload public prefix is empty, stored uploads will not be served");
    } else {
        router = router.nest_service(&upload_prefix, ServeDir::new(&state.upload.directory));
    }

    router
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
