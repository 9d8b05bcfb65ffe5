//! Friend request entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

/// Friend request identifier, assigned by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendRequestId(i64);

impl FriendRequestId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for FriendRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed request from `sender` to `receiver`
///
/// The ordered pair is unique across the store; the reverse direction is a
/// different request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendRequest {
    id: Option<FriendRequestId>,
    sender: UserId,
    receiver: UserId,
    created_at: DateTime<Utc>,
}

impl FriendRequest {
    /// Record a request between two persisted users
    pub fn new(sender: &User, receiver: &User) -> Result<Self, DomainError> {
        let sender = sender
            .id()
            .ok_or_else(|| DomainError::invalid_argument("Sender must be a registered user"))?;
        let receiver = receiver
            .id()
            .ok_or_else(|| DomainError::invalid_argument("Receiver must be a registered user"))?;

        Ok(Self {
            id: None,
            sender,
            receiver,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a request from stored state
    pub fn rehydrate(
        id: FriendRequestId,
        sender: UserId,
        receiver: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            sender,
            receiver,
            created_at,
        }
    }

    pub fn with_id(mut self, id: FriendRequestId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<FriendRequestId> {
        self.id
    }

    pub fn sender(&self) -> UserId {
        self.sender
    }

    pub fn receiver(&self) -> UserId {
        self.receiver
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The uniqueness key
    pub fn pair(&self) -> (UserId, UserId) {
        (self.sender, self.receiver)
    }

    /// Whether the user is either end of this request
    pub fn involves(&self, user_id: UserId) -> bool {
        self.sender == user_id || self.receiver == user_id
    }
}
