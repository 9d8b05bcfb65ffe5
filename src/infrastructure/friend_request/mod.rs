//! Friend request infrastructure

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresFriendRequestRepository;
pub use repository::InMemoryFriendRequestRepository;
pub use service::FriendRequestService;
