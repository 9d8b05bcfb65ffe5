//! zzinbros
//!
//! A small social backend:
//! - User registration with validated name, email and password
//! - Session login and owner-only profile modification and deletion
//! - Directed friend requests between users
//! - In-memory or PostgreSQL persistence

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, FriendRequestServiceTrait, UserServiceTrait};
use infrastructure::{
    friend_request::{
        FriendRequestService, InMemoryFriendRequestRepository, PostgresFriendRequestRepository,
    },
    session::InMemorySessionStore,
    storage::{run_storage_migrations, PostgresConfig, StorageType},
    upload::LocalUploadStore,
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_backend = config.storage.storage_type().ok_or_else(|| {
        anyhow::anyhow!("Unknown storage backend '{}'", config.storage.backend)
    })?;

    info!("Storage backend: {:?}", storage_backend);

    let hasher = Arc::new(Argon2Hasher::new());

    let (user_service, friend_request_service): (
        Arc<dyn UserServiceTrait>,
        Arc<dyn FriendRequestServiceTrait>,
    ) = match storage_backend {
        StorageType::Postgres => {
            let pool = postgres_config(config)?.connect().await?;
            info!("PostgreSQL connection established");

            let applied = run_storage_migrations(&pool).await?;
            info!(applied, "Storage migrations checked");

            let users = Arc::new(PostgresUserRepository::new(pool.clone()));
            let friend_requests = Arc::new(PostgresFriendRequestRepository::new(pool));
            (
                Arc::new(UserService::new(
                    users.clone(),
                    friend_requests.clone(),
                    hasher,
                )),
                Arc::new(FriendRequestService::new(users, friend_requests)),
            )
        }
        StorageType::InMemory => {
            let users = Arc::new(InMemoryUserRepository::new());
            let friend_requests = Arc::new(InMemoryFriendRequestRepository::new());
            (
                Arc::new(UserService::new(
                    users.clone(),
                    friend_requests.clone(),
                    hasher,
                )),
                Arc::new(FriendRequestService::new(users, friend_requests)),
            )
        }
    };

    Ok(AppState {
        user_service,
        friend_request_service,
        session_store: Arc::new(InMemorySessionStore::with_ttl_minutes(
            config.session.ttl_minutes,
        )),
        upload_store: Arc::new(LocalUploadStore::new(
            &config.upload.directory,
            config.upload.public_prefix.clone(),
            config.upload.max_size_bytes,
        )),
        session: config.session.clone(),
        upload: config.upload.clone(),
    })
}

/// Pool settings from `storage`, falling back to `DATABASE_URL`
pub fn postgres_config(config: &AppConfig) -> anyhow::Result<PostgresConfig> {
    let url = match &config.storage.database_url {
        Some(url) => url.clone(),
        None => std::env::var("DATABASE_URL").map_err(|_| {
            anyhow::anyhow!("storage.database_url or DATABASE_URL is required for PostgreSQL")
        })?,
    };

    Ok(PostgresConfig::new(url).with_max_connections(config.storage.max_connections))
}
