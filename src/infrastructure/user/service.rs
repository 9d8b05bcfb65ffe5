//! User service: lookup, registration, modification, deletion and login

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::friend_request::FriendRequestRepository;
use crate::domain::session::UserSession;
use crate::domain::upload::UploadedFile;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Replacement values for an existing user
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Public view of a user; never carries the password
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<UploadedFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    fn from_user(user: &User) -> Result<Self, DomainError> {
        let id = user
            .id()
            .ok_or_else(|| DomainError::internal("User has not been persisted"))?;

        Ok(Self {
            id,
            name: user.name().to_string(),
            email: user.email().to_string(),
            profile_image: user.profile_image().cloned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        })
    }

    /// Session capability matching this projection
    pub fn to_session(&self) -> UserSession {
        UserSession::new(self.id, self.name.clone(), self.email.clone())
    }
}

impl TryFrom<&User> for UserResponse {
    type Error = DomainError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        Self::from_user(user)
    }
}

/// User service
#[derive(Debug)]
pub struct UserService<R: UserRepository, F: FriendRequestRepository, H: PasswordHasher> {
    users: Arc<R>,
    friend_requests: Arc<F>,
    hasher: Arc<H>,
}

impl<R: UserRepository, F: FriendRequestRepository, H: PasswordHasher> UserService<R, F, H> {
    pub fn new(users: Arc<R>, friend_requests: Arc<F>, hasher: Arc<H>) -> Self {
        Self {
            users,
            friend_requests,
            hasher,
        }
    }

    async fn load(&self, id: UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Get a user by id
    pub async fn find_user_by_id(&self, id: UserId) -> Result<User, DomainError> {
        self.load(id).await
    }

    /// Register a new user
    ///
    /// Fields are validated before anything touches the store, and the
    /// password is hashed only after validation passed on the plaintext.
    pub async fn register(
        &self,
        request: RegisterUserRequest,
        profile_image: Option<UploadedFile>,
    ) -> Result<User, DomainError> {
        let mut user = User::new(request.name, request.email, request.password)?;

        if self.users.find_by_email(user.email()).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                user.email()
            )));
        }

        let hash = self.hasher.hash(user.password())?;
        user.replace_password(hash);

        if let Some(image) = profile_image {
            user.set_profile_image(image);
        }

        let saved = self.users.save(user).await?;
        info!(user_id = ?saved.id(), "Registered user");

        Ok(saved)
    }

    /// Replace a user's name, email and password
    ///
    /// Only the session owning the record may modify it.
    pub async fn modify(
        &self,
        id: UserId,
        request: UpdateUserRequest,
        session: &UserSession,
        profile_image: Option<UploadedFile>,
    ) -> Result<UserResponse, DomainError> {
        let mut user = self.load(id).await?;

        if !session.owns(id) {
            return Err(DomainError::unauthorized(format!(
                "Not allowed to modify user '{}'",
                id
            )));
        }

        let replacement = User::new(request.name, request.email, request.password)?;

        if let Some(owner) = self.users.find_by_email(replacement.email()).await? {
            if owner.id() != Some(id) {
                return Err(DomainError::conflict(format!(
                    "Email '{}' already exists",
                    replacement.email()
                )));
            }
        }

        user.update(&replacement);
        let hash = self.hasher.hash(replacement.password())?;
        user.replace_password(hash);

        if let Some(image) = profile_image {
            user.set_profile_image(image);
        }

        let saved = self.users.save(user).await?;
        debug!(user_id = %id, "Modified user");

        UserResponse::from_user(&saved)
    }

    /// Delete a user together with every friend request it takes part in
    pub async fn delete(&self, id: UserId, session: &UserSession) -> Result<(), DomainError> {
        self.load(id).await?;

        if !session.owns(id) {
            return Err(DomainError::unauthorized(format!(
                "Not allowed to delete user '{}'",
                id
            )));
        }

        let removed = self.friend_requests.delete_involving(id).await?;

        if !self.users.delete(id).await? {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        info!(user_id = %id, friend_requests = removed, "Deleted user");

        Ok(())
    }

    /// Check credentials and build the session capability
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserSession, DomainError> {
        let invalid = || DomainError::unauthorized("Invalid email or password");

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !self.hasher.verify(password, user.password()) {
            return Err(invalid());
        }

        user.to_session().ok_or_else(invalid)
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.users.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::friend_request::{FriendRequest, MockFriendRequestRepository};
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::friend_request::InMemoryFriendRequestRepository;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;
    use uuid::Uuid;

    type TestService =
        UserService<InMemoryUserRepository, InMemoryFriendRequestRepository, Argon2Hasher>;

    fn create_service() -> (TestService, Arc<InMemoryFriendRequestRepository>) {
        let friend_requests = Arc::new(InMemoryFriendRequestRepository::new());
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            friend_requests.clone(),
            Arc::new(Argon2Hasher::new()),
        );
        (service, friend_requests)
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn update_request(name: &str, email: &str, password: &str) -> UpdateUserRequest {
        UpdateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn image() -> UploadedFile {
        UploadedFile {
            id: Uuid::new_v4(),
            original_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            size: 3,
            url: "/uploads/me.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_find() {
        let (service, _) = create_service();

        let user = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();

        let id = user.id().unwrap();
        let found = service.find_user_by_id(id).await.unwrap();

        assert_eq!(found, user);
        assert_eq!(found.name(), "ab");
        assert_ne!(found.password(), "password");
    }

    #[tokio::test]
    async fn test_register_attaches_profile_image() {
        let (service, _) = create_service();

        let user = service
            .register(register_request("ab", "a@b.com", "password"), Some(image()))
            .await
            .unwrap();

        assert_eq!(user.profile_image().unwrap().original_name, "me.png");
    }

    #[tokio::test]
    async fn test_register_invalid_fields() {
        let (service, _) = create_service();

        let short_name = service
            .register(register_request("a", "a@b.com", "password"), None)
            .await;
        assert!(matches!(short_name, Err(DomainError::InvalidArgument { .. })));

        let long_password = service
            .register(register_request("ab", "a@b.com", &"p".repeat(30)), None)
            .await;
        assert!(matches!(long_password, Err(DomainError::InvalidArgument { .. })));

        let bad_email = service
            .register(register_request("ab", "ab.com", "password"), None)
            .await;
        assert!(matches!(bad_email, Err(DomainError::InvalidArgument { .. })));

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, _) = create_service();

        service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();

        let result = service
            .register(register_request("cd", "a@b.com", "password2"), None)
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let (service, _) = create_service();

        let result = service.find_user_by_id(UserId::new(42)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_modify_own_record() {
        let (service, _) = create_service();

        let user = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();
        let session = user.to_session().unwrap();
        let id = user.id().unwrap();

        let response = service
            .modify(
                id,
                update_request("cd", "c@d.com", "password2"),
                &session,
                Some(image()),
            )
            .await
            .unwrap();

        assert_eq!(response.id, id);
        assert_eq!(response.name, "cd");
        assert_eq!(response.email, "c@d.com");
        assert!(response.profile_image.is_some());

        assert!(service.authenticate("c@d.com", "password2").await.is_ok());
        assert!(service.authenticate("c@d.com", "password").await.is_err());
    }

    #[tokio::test]
    async fn test_modify_other_user_is_unauthorized() {
        let (service, _) = create_service();

        let owner = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();
        let intruder = service
            .register(register_request("cd", "c@d.com", "password"), None)
            .await
            .unwrap();

        let result = service
            .modify(
                owner.id().unwrap(),
                update_request("zz", "z@z.com", "password"),
                &intruder.to_session().unwrap(),
                None,
            )
            .await;

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));

        let unchanged = service.find_user_by_id(owner.id().unwrap()).await.unwrap();
        assert_eq!(unchanged.name(), "ab");
    }

    #[tokio::test]
    async fn test_modify_missing_user() {
        let (service, _) = create_service();
        let session = UserSession::new(UserId::new(9), "ab", "a@b.com");

        let result = service
            .modify(
                UserId::new(9),
                update_request("cd", "c@d.com", "password"),
                &session,
                None,
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_modify_with_invalid_values_keeps_record() {
        let (service, _) = create_service();

        let user = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();
        let id = user.id().unwrap();

        let result = service
            .modify(
                id,
                update_request("a", "a@b.com", "password"),
                &user.to_session().unwrap(),
                None,
            )
            .await;

        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
        assert_eq!(service.find_user_by_id(id).await.unwrap().name(), "ab");
    }

    #[tokio::test]
    async fn test_modify_to_taken_email() {
        let (service, _) = create_service();

        service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();
        let user = service
            .register(register_request("cd", "c@d.com", "password"), None)
            .await
            .unwrap();

        let result = service
            .modify(
                user.id().unwrap(),
                update_request("cd", "a@b.com", "password"),
                &user.to_session().unwrap(),
                None,
            )
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_modify_keeping_own_email() {
        let (service, _) = create_service();

        let user = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();

        let response = service
            .modify(
                user.id().unwrap(),
                update_request("abc", "a@b.com", "password"),
                &user.to_session().unwrap(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(response.name, "abc");
    }

    #[tokio::test]
    async fn test_delete_removes_friend_requests() {
        let (service, friend_requests) = create_service();

        let a = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();
        let b = service
            .register(register_request("cd", "c@d.com", "password"), None)
            .await
            .unwrap();

        friend_requests
            .save(FriendRequest::new(&a, &b).unwrap())
            .await
            .unwrap();
        friend_requests
            .save(FriendRequest::new(&b, &a).unwrap())
            .await
            .unwrap();

        service
            .delete(a.id().unwrap(), &a.to_session().unwrap())
            .await
            .unwrap();

        assert!(matches!(
            service.find_user_by_id(a.id().unwrap()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(friend_requests
            .find_by_sender(b.id().unwrap())
            .await
            .unwrap()
            .is_empty());
        assert!(friend_requests
            .find_by_receiver(b.id().unwrap())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_other_user_is_unauthorized() {
        let (service, _) = create_service();

        let a = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();
        let b = service
            .register(register_request("cd", "c@d.com", "password"), None)
            .await
            .unwrap();

        let result = service
            .delete(a.id().unwrap(), &b.to_session().unwrap())
            .await;

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let (service, _) = create_service();

        let user = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();

        let session = service.authenticate("a@b.com", "password").await.unwrap();
        assert!(session.owns(user.id().unwrap()));
        assert_eq!(session.name(), "ab");

        let wrong_password = service.authenticate("a@b.com", "wrong-password").await;
        assert!(matches!(wrong_password, Err(DomainError::Unauthorized { .. })));

        let unknown = service.authenticate("x@y.com", "password").await;
        assert!(matches!(unknown, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_register_then_modify_then_delete() {
        let (service, _) = create_service();

        let user = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await
            .unwrap();
        let id = user.id().unwrap();
        let session = user.to_session().unwrap();

        let response = service
            .modify(id, update_request("cd", "c@d.com", "password2"), &session, None)
            .await
            .unwrap();
        assert_eq!(response.name, "cd");
        assert_eq!(response.email, "c@d.com");

        service.delete(id, &response.to_session()).await.unwrap();

        assert!(matches!(
            service.find_user_by_id(id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_register_surfaces_store_failure() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_save()
            .returning(|_| Err(DomainError::storage("connection reset")));

        let service = UserService::new(
            Arc::new(users),
            Arc::new(MockFriendRequestRepository::new()),
            Arc::new(Argon2Hasher::new()),
        );

        let result = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_register_store_conflict_is_conflict() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_save()
            .returning(|_| Err(DomainError::conflict("Email 'a@b.com' already exists")));

        let service = UserService::new(
            Arc::new(users),
            Arc::new(MockFriendRequestRepository::new()),
            Arc::new(Argon2Hasher::new()),
        );

        let result = service
            .register(register_request("ab", "a@b.com", "password"), None)
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_delete_stops_when_friend_request_cleanup_fails() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| {
            Ok(Some(
                User::new("ab", "a@b.com", "password").unwrap().with_id(id),
            ))
        });
        users.expect_delete().never();

        let mut friend_requests = MockFriendRequestRepository::new();
        friend_requests
            .expect_delete_involving()
            .returning(|_| Err(DomainError::storage("timeout")));

        let service = UserService::new(
            Arc::new(users),
            Arc::new(friend_requests),
            Arc::new(Argon2Hasher::new()),
        );
        let session = UserSession::new(UserId::new(1), "ab", "a@b.com");

        let result = service.delete(UserId::new(1), &session).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
