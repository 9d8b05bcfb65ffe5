//! Domain layer - Core business logic and entities

pub mod error;
pub mod friend_request;
pub mod session;
pub mod upload;
pub mod user;

pub use error::DomainError;
pub use friend_request::{FriendRequest, FriendRequestId, FriendRequestRepository};
pub use session::{SessionStore, SessionToken, UserSession};
pub use upload::{UploadRequest, UploadStore, UploadedFile};
pub use user::{User, UserId, UserRepository, UserValidationError};
