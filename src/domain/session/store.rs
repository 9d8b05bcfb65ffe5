//! Session store trait

use async_trait::async_trait;

use super::entity::{SessionToken, UserSession};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Collaborator holding logged-in sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a session and return the token that resolves to it
    async fn create(&self, session: UserSession) -> Result<SessionToken, DomainError>;

    /// Resolve a token; expired or unknown tokens yield `None`
    async fn get(&self, token: &SessionToken) -> Result<Option<UserSession>, DomainError>;

    /// Replace the session behind an existing token
    async fn replace(&self, token: &SessionToken, session: UserSession)
        -> Result<(), DomainError>;

    /// Close one session
    async fn remove(&self, token: &SessionToken) -> Result<bool, DomainError>;

    /// Close every session of a user, returning how many were removed
    async fn remove_user(&self, user_id: UserId) -> Result<usize, DomainError>;
}
