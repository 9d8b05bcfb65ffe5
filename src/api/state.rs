//! Application state for shared services

use std::sync::Arc;

use crate::config::{SessionConfig, UploadConfig};
use crate::domain::friend_request::FriendRequestRepository;
use crate::domain::session::SessionStore;
use crate::domain::upload::UploadStore;
use crate::domain::user::UserRepository;
use crate::domain::{DomainError, FriendRequest, UploadedFile, User, UserId, UserSession};
use crate::infrastructure::friend_request::FriendRequestService;
use crate::infrastructure::user::{
    PasswordHasher, RegisterUserRequest, UpdateUserRequest, UserResponse, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub friend_request_service: Arc<dyn FriendRequestServiceTrait>,
    pub session_store: Arc<dyn SessionStore>,
    pub upload_store: Arc<dyn UploadStore>,
    pub session: SessionConfig,
    pub upload: UploadConfig,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn find_user_by_id(&self, id: UserId) -> Result<User, DomainError>;
    async fn register(
        &self,
        request: RegisterUserRequest,
        profile_image: Option<UploadedFile>,
    ) -> Result<User, DomainError>;
    async fn modify(
        &self,
        id: UserId,
        request: UpdateUserRequest,
        session: &UserSession,
        profile_image: Option<UploadedFile>,
    ) -> Result<UserResponse, DomainError>;
    async fn delete(&self, id: UserId, session: &UserSession) -> Result<(), DomainError>;
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserSession, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for friend request operations
#[async_trait::async_trait]
pub trait FriendRequestServiceTrait: Send + Sync {
    async fn send(
        &self,
        session: &UserSession,
        receiver_id: UserId,
    ) -> Result<FriendRequest, DomainError>;
    async fn received(&self, session: &UserSession) -> Result<Vec<FriendRequest>, DomainError>;
    async fn sent(&self, session: &UserSession) -> Result<Vec<FriendRequest>, DomainError>;
}

#[async_trait::async_trait]
impl<R, F, H> UserServiceTrait for UserService<R, F, H>
where
    R: UserRepository + 'static,
    F: FriendRequestRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn find_user_by_id(&self, id: UserId) -> Result<User, DomainError> {
        UserService::find_user_by_id(self, id).await
    }

    async fn register(
        &self,
        request: RegisterUserRequest,
        profile_image: Option<UploadedFile>,
    ) -> Result<User, DomainError> {
        UserService::register(self, request, profile_image).await
    }

    async fn modify(
        &self,
        id: UserId,
        request: UpdateUserRequest,
        session: &UserSession,
        profile_image: Option<UploadedFile>,
    ) -> Result<UserResponse, DomainError> {
        UserService::modify(self, id, request, session, profile_image).await
    }

    async fn delete(&self, id: UserId, session: &UserSession) -> Result<(), DomainError> {
        UserService::delete(self, id, session).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserSession, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R, F> FriendRequestServiceTrait for FriendRequestService<R, F>
where
    R: UserRepository + 'static,
    F: FriendRequestRepository + 'static,
{
    async fn send(
        &self,
        session: &UserSession,
        receiver_id: UserId,
    ) -> Result<FriendRequest, DomainError> {
        FriendRequestService::send(self, session, receiver_id).await
    }

    async fn received(&self, session: &UserSession) -> Result<Vec<FriendRequest>, DomainError> {
        FriendRequestService::received(self, session).await
    }

    async fn sent(&self, session: &UserSession) -> Result<Vec<FriendRequest>, DomainError> {
        FriendRequestService::sent(self, session).await
    }
}
