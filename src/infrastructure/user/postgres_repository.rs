//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::upload::UploadedFile;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

const USER_COLUMNS: &str =
    "id, name, email, password, profile_image, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
///
/// Relies on the `users` table created by the storage migrations, whose
/// `uk_user_email` constraint enforces email uniqueness.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, user: User) -> Result<User, DomainError> {
        let profile_image = profile_image_to_json(&user)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, password, profile_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user.name())
        .bind(user.email())
        .bind(user.password())
        .bind(profile_image)
        .bind(user.created_at())
        .bind(user.updated_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &user, "create"))?;

        Ok(user.with_id(UserId::new(id)))
    }

    async fn update(&self, id: UserId, user: User) -> Result<User, DomainError> {
        let profile_image = profile_image_to_json(&user)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password = $4, profile_image = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .bind(user.name())
        .bind(user.email())
        .bind(user.password())
        .bind(profile_image)
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &user, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        Ok(user)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: User) -> Result<User, DomainError> {
        match user.id() {
            None => self.insert(user).await,
            Some(id) => self.update(id, user).await,
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count.max(0) as usize)
    }
}

fn write_error(e: sqlx::Error, user: &User, action: &str) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::conflict(format!("Email '{}' already exists", user.email()))
    } else {
        DomainError::storage(format!("Failed to {} user: {}", action, e))
    }
}

fn profile_image_to_json(user: &User) -> Result<Option<serde_json::Value>, DomainError> {
    user.profile_image()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| DomainError::storage(format!("Failed to serialize profile image: {}", e)))
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let column_error = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: i64 = row.try_get("id").map_err(column_error)?;
    let name: String = row.try_get("name").map_err(column_error)?;
    let email: String = row.try_get("email").map_err(column_error)?;
    let password: String = row.try_get("password").map_err(column_error)?;
    let profile_image: Option<serde_json::Value> =
        row.try_get("profile_image").map_err(column_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_error)?;

    let profile_image: Option<UploadedFile> = profile_image
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| DomainError::storage(format!("Invalid profile image in database: {}", e)))?;

    Ok(User::rehydrate(
        UserId::new(id),
        name,
        email,
        password,
        profile_image,
        created_at,
        updated_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_without_constraint_is_storage() {
        let user = User::new("ab", "a@b.com", "password").unwrap();
        let err = write_error(sqlx::Error::RowNotFound, &user, "create");

        assert!(matches!(err, DomainError::Storage { .. }));
    }

    #[test]
    fn test_profile_image_absent_serializes_to_none() {
        let user = User::new("ab", "a@b.com", "password").unwrap();

        assert_eq!(profile_image_to_json(&user).unwrap(), None);
    }
}
