//! Friend request service

use std::sync::Arc;

use tracing::info;

use crate::domain::friend_request::{FriendRequest, FriendRequestRepository};
use crate::domain::session::UserSession;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Sends and lists friend requests on behalf of the session user
#[derive(Debug)]
pub struct FriendRequestService<R: UserRepository, F: FriendRequestRepository> {
    users: Arc<R>,
    friend_requests: Arc<F>,
}

impl<R: UserRepository, F: FriendRequestRepository> FriendRequestService<R, F> {
    pub fn new(users: Arc<R>, friend_requests: Arc<F>) -> Self {
        Self {
            users,
            friend_requests,
        }
    }

    async fn load_user(&self, id: UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Send a request from the session user to `receiver_id`
    pub async fn send(
        &self,
        session: &UserSession,
        receiver_id: UserId,
    ) -> Result<FriendRequest, DomainError> {
        let sender = self.load_user(session.user_id()).await?;
        let receiver = self.load_user(receiver_id).await?;

        let request = FriendRequest::new(&sender, &receiver)?;
        let saved = self.friend_requests.save(request).await?;

        info!(
            sender = %session.user_id(),
            receiver = %receiver_id,
            "Sent friend request"
        );

        Ok(saved)
    }

    /// Requests addressed to the session user
    pub async fn received(&self, session: &UserSession) -> Result<Vec<FriendRequest>, DomainError> {
        self.friend_requests
            .find_by_receiver(session.user_id())
            .await
    }

    /// Requests issued by the session user
    pub async fn sent(&self, session: &UserSession) -> Result<Vec<FriendRequest>, DomainError> {
        self.friend_requests.find_by_sender(session.user_id()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::friend_request::MockFriendRequestRepository;
    use crate::infrastructure::friend_request::InMemoryFriendRequestRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    type TestService = FriendRequestService<InMemoryUserRepository, InMemoryFriendRequestRepository>;

    async fn setup() -> (TestService, UserSession, UserSession) {
        let users = Arc::new(InMemoryUserRepository::new());
        let a = users
            .save(User::new("ab", "a@b.com", "password").unwrap())
            .await
            .unwrap();
        let b = users
            .save(User::new("cd", "c@d.com", "password").unwrap())
            .await
            .unwrap();

        let service =
            FriendRequestService::new(users, Arc::new(InMemoryFriendRequestRepository::new()));

        (service, a.to_session().unwrap(), b.to_session().unwrap())
    }

    #[tokio::test]
    async fn test_send_and_list() {
        let (service, a, b) = setup().await;

        let request = service.send(&a, b.user_id()).await.unwrap();
        assert!(request.id().is_some());
        assert_eq!(request.pair(), (a.user_id(), b.user_id()));

        let sent = service.sent(&a).await.unwrap();
        assert_eq!(sent.len(), 1);

        let received = service.received(&b).await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].sender(), a.user_id());

        assert!(service.received(&a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_duplicate_conflicts() {
        let (service, a, b) = setup().await;

        service.send(&a, b.user_id()).await.unwrap();
        let result = service.send(&a, b.user_id()).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        // Opposite direction is a separate edge
        assert!(service.send(&b, a.user_id()).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_to_missing_user() {
        let (service, a, _) = setup().await;

        let result = service.send(&a, UserId::new(99)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_send_from_deleted_sender() {
        let (service, _, b) = setup().await;
        let ghost = UserSession::new(UserId::new(99), "zz", "z@z.com");

        let result = service.send(&ghost, b.user_id()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_listing_surfaces_store_failure() {
        let mut friend_requests = MockFriendRequestRepository::new();
        friend_requests
            .expect_find_by_receiver()
            .returning(|_| Err(DomainError::storage("connection refused")));

        let service = FriendRequestService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(friend_requests),
        );
        let session = UserSession::new(UserId::new(1), "ab", "a@b.com");

        let result = service.received(&session).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
