//! In-memory friend request repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::friend_request::{FriendRequest, FriendRequestId, FriendRequestRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of FriendRequestRepository
///
/// Enforces the same `(sender, receiver)` uniqueness as the relational schema.
#[derive(Debug)]
pub struct InMemoryFriendRequestRepository {
    requests: Arc<RwLock<HashMap<FriendRequestId, FriendRequest>>>,
    sequence: AtomicI64,
}

impl InMemoryFriendRequestRepository {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            sequence: AtomicI64::new(0),
        }
    }

    fn next_id(&self) -> FriendRequestId {
        FriendRequestId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Default for InMemoryFriendRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted(mut requests: Vec<FriendRequest>) -> Vec<FriendRequest> {
    requests.sort_by_key(|r| r.id());
    requests
}

#[async_trait]
impl FriendRequestRepository for InMemoryFriendRequestRepository {
    async fn save(&self, request: FriendRequest) -> Result<FriendRequest, DomainError> {
        let mut requests = self.requests.write().await;

        let duplicate = requests
            .values()
            .any(|r| r.pair() == request.pair() && r.id() != request.id());
        if duplicate {
            return Err(DomainError::conflict(format!(
                "Friend request from '{}' to '{}' already exists",
                request.sender(),
                request.receiver()
            )));
        }

        match request.id() {
            None => {
                let id = self.next_id();
                let stored = request.with_id(id);
                requests.insert(id, stored.clone());
                Ok(stored)
            }
            Some(id) => {
                if !requests.contains_key(&id) {
                    return Err(DomainError::not_found(format!(
                        "Friend request '{}' not found",
                        id
                    )));
                }

                requests.insert(id, request.clone());
                Ok(request)
            }
        }
    }

    async fn find_by_id(&self, id: FriendRequestId) -> Result<Option<FriendRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn find_by_sender(&self, sender: UserId) -> Result<Vec<FriendRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(sorted(
            requests
                .values()
                .filter(|r| r.sender() == sender)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_receiver(&self, receiver: UserId) -> Result<Vec<FriendRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(sorted(
            requests
                .values()
                .filter(|r| r.receiver() == receiver)
                .cloned()
                .collect(),
        ))
    }

    async fn delete(&self, id: FriendRequestId) -> Result<bool, DomainError> {
        let mut requests = self.requests.write().await;
        Ok(requests.remove(&id).is_some())
    }

    async fn delete_involving(&self, user_id: UserId) -> Result<u64, DomainError> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|_, r| !r.involves(user_id));
        Ok((before - requests.len()) as u64)
    }
}
