//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
///
/// Ids come from a monotonically increasing sequence starting at 1, and
/// emails are unique as in the relational schema.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    sequence: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            sequence: AtomicI64::new(0),
        }
    }

    fn next_id(&self) -> UserId {
        UserId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn email_taken(users: &HashMap<UserId, User>, email: &str, except: Option<UserId>) -> bool {
    users
        .values()
        .any(|u| u.email() == email && u.id() != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        match user.id() {
            None => {
                if email_taken(&users, user.email(), None) {
                    return Err(DomainError::conflict(format!(
                        "Email '{}' already exists",
                        user.email()
                    )));
                }

                let id = self.next_id();
                let stored = user.with_id(id);
                users.insert(id, stored.clone());

                Ok(stored)
            }
            Some(id) => {
                if !users.contains_key(&id) {
                    return Err(DomainError::not_found(format!("User '{}' not found", id)));
                }

                if email_taken(&users, user.email(), Some(id)) {
                    return Err(DomainError::conflict(format!(
                        "Email '{}' already exists",
                        user.email()
                    )));
                }

                users.insert(id, user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self.users.read().await;
        Ok(users.len())
    }
}
