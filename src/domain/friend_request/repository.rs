//! Friend request repository trait

use async_trait::async_trait;

use super::entity::{FriendRequest, FriendRequestId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for friend request persistence
///
/// Implementations enforce uniqueness of the `(sender, receiver)` pair and
/// report a duplicate as `DomainError::Conflict`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FriendRequestRepository: Send + Sync {
    /// Insert a new request and return it with its assigned id
    async fn save(&self, request: FriendRequest) -> Result<FriendRequest, DomainError>;

    /// Finds a request by id
    async fn find_by_id(&self, id: FriendRequestId)
        -> Result<Option<FriendRequest>, DomainError>;

    /// Requests issued by a user, oldest first
    async fn find_by_sender(&self, sender: UserId) -> Result<Vec<FriendRequest>, DomainError>;

    /// Requests addressed to a user, oldest first
    async fn find_by_receiver(&self, receiver: UserId)
        -> Result<Vec<FriendRequest>, DomainError>;

    /// Deletes a request by id
    async fn delete(&self, id: FriendRequestId) -> Result<bool, DomainError>;

    /// Deletes every request the user sent or received
    async fn delete_involving(&self, user_id: UserId) -> Result<u64, DomainError>;
}
