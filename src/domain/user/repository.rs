//! User repository trait

use async_trait::async_trait;

use super::entity::{User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for user storage
///
/// Implementations own email uniqueness: a save that would give two users the
/// same email fails with `DomainError::Conflict`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user when it has no id yet, update it otherwise
    ///
    /// Returns the stored user carrying its assigned id. Updating a user that
    /// no longer exists fails with `DomainError::NotFound`.
    async fn save(&self, user: User) -> Result<User, DomainError>;

    /// Get a user by id
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email (for login and uniqueness checks)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Delete a user, returning whether a row was removed
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;

    /// Count stored users
    async fn count(&self) -> Result<usize, DomainError>;
}
