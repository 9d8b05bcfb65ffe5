//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_user_fields, UserValidationError};
use crate::domain::session::UserSession;
use crate::domain::upload::UploadedFile;

/// User identifier, assigned by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User entity
///
/// A `User` built through [`User::new`] always satisfies the name, email and
/// password rules. Identity comes from the store: two users are equal only
/// when both carry the same assigned id.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: Option<UserId>,
    name: String,
    email: String,
    /// Never exposed in serialization
    #[serde(skip_serializing)]
    password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_image: Option<UploadedFile>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unpersisted user after validating every field
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let email = email.into();
        let password = password.into();

        validate_user_fields(&name, &email, &password)?;

        let now = Utc::now();

        Ok(Self {
            id: None,
            name,
            email,
            password,
            profile_image: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a user from stored state without re-running validation
    pub fn rehydrate(
        id: UserId,
        name: String,
        email: String,
        password: String,
        profile_image: Option<UploadedFile>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            email,
            password,
            profile_image,
            created_at,
            updated_at,
        }
    }

    /// Attach the id assigned by the store
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    // Getters

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Stored credential: plaintext before the service protects it, a hash after
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn profile_image(&self) -> Option<&UploadedFile> {
        self.profile_image.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    // Mutators

    /// Overwrite name, email and password with the values of `other`
    ///
    /// The copy is unconditional; `other` is not re-validated here.
    pub fn update(&mut self, other: &User) {
        self.name = other.name.clone();
        self.email = other.email.clone();
        self.password = other.password.clone();
        self.touch();
    }

    /// Replace the stored credential, e.g. with its hash
    pub fn replace_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
        self.touch();
    }

    pub fn set_profile_image(&mut self, image: UploadedFile) {
        self.profile_image = Some(image);
        self.touch();
    }

    /// Session capability for this user, if it has been persisted
    pub fn to_session(&self) -> Option<UserSession> {
        self.id
            .map(|id| UserSession::new(id, self.name.clone(), self.email.clone()))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl std::hash::Hash for User {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
