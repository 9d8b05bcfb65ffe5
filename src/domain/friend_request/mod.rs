//! Friend request domain
//!
//! A bare directed edge between two users. There is no acceptance state.

mod entity;
mod repository;

pub use entity::{FriendRequest, FriendRequestId};
pub use repository::FriendRequestRepository;

#[cfg(test)]
pub use repository::MockFriendRequestRepository;
