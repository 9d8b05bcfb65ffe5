//! Infrastructure layer - persistence, sessions, uploads and logging

pub mod friend_request;
pub mod logging;
pub mod session;
pub mod storage;
pub mod upload;
pub mod user;
