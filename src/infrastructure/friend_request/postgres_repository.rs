//! PostgreSQL friend request repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::friend_request::{FriendRequest, FriendRequestId, FriendRequestRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

const FRIEND_REQUEST_COLUMNS: &str = "id, sender_id, receiver_id, created_at";

/// PostgreSQL implementation of FriendRequestRepository
///
/// Pair uniqueness is enforced by `uk_friend_request_sender_and_receiver`.
#[derive(Debug, Clone)]
pub struct PostgresFriendRequestRepository {
    pool: PgPool,
}

impl PostgresFriendRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, request: FriendRequest) -> Result<FriendRequest, DomainError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO friend_requests (sender_id, receiver_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(request.sender().value())
        .bind(request.receiver().value())
        .bind(request.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &request, "create"))?;

        Ok(request.with_id(FriendRequestId::new(id)))
    }

    async fn update(
        &self,
        id: FriendRequestId,
        request: FriendRequest,
    ) -> Result<FriendRequest, DomainError> {
        let result = sqlx::query(
            "UPDATE friend_requests SET sender_id = $2, receiver_id = $3 WHERE id = $1",
        )
        .bind(id.value())
        .bind(request.sender().value())
        .bind(request.receiver().value())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &request, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Friend request '{}' not found",
                id
            )));
        }

        Ok(request)
    }

    async fn find_where(
        &self,
        column: &str,
        user_id: UserId,
    ) -> Result<Vec<FriendRequest>, DomainError> {
        let query = format!(
            "SELECT {} FROM friend_requests WHERE {} = $1 ORDER BY id",
            FRIEND_REQUEST_COLUMNS, column
        );

        let rows = sqlx::query(&query)
            .bind(user_id.value())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list friend requests: {}", e)))?;

        rows.iter().map(row_to_friend_request).collect()
    }
}

#[async_trait]
impl FriendRequestRepository for PostgresFriendRequestRepository {
    async fn save(&self, request: FriendRequest) -> Result<FriendRequest, DomainError> {
        match request.id() {
            None => self.insert(request).await,
            Some(id) => self.update(id, request).await,
        }
    }

    async fn find_by_id(&self, id: FriendRequestId) -> Result<Option<FriendRequest>, DomainError> {
        let query = format!(
            "SELECT {} FROM friend_requests WHERE id = $1",
            FRIEND_REQUEST_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get friend request: {}", e)))?;

        row.as_ref().map(row_to_friend_request).transpose()
    }

    async fn find_by_sender(&self, sender: UserId) -> Result<Vec<FriendRequest>, DomainError> {
        self.find_where("sender_id", sender).await
    }

    async fn find_by_receiver(&self, receiver: UserId) -> Result<Vec<FriendRequest>, DomainError> {
        self.find_where("receiver_id", receiver).await
    }

    async fn delete(&self, id: FriendRequestId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM friend_requests WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete friend request: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_involving(&self, user_id: UserId) -> Result<u64, DomainError> {
        let result =
            sqlx::query("DELETE FROM friend_requests WHERE sender_id = $1 OR receiver_id = $1")
                .bind(user_id.value())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to delete friend requests: {}", e))
                })?;

        Ok(result.rows_affected())
    }
}

fn write_error(e: sqlx::Error, request: &FriendRequest, action: &str) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::conflict(format!(
            "Friend request from '{}' to '{}' already exists",
            request.sender(),
            request.receiver()
        ))
    } else {
        DomainError::storage(format!("Failed to {} friend request: {}", action, e))
    }
}

fn row_to_friend_request(row: &PgRow) -> Result<FriendRequest, DomainError> {
    let column_error =
        |e: sqlx::Error| DomainError::storage(format!("Invalid friend request row: {}", e));

    let id: i64 = row.try_get("id").map_err(column_error)?;
    let sender_id: i64 = row.try_get("sender_id").map_err(column_error)?;
    let receiver_id: i64 = row.try_get("receiver_id").map_err(column_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;

    Ok(FriendRequest::rehydrate(
        FriendRequestId::new(id),
        UserId::new(sender_id),
        UserId::new(receiver_id),
        created_at,
    ))
}
