//! Session domain

mod entity;
mod store;

pub use entity::{SessionToken, UserSession};
pub use store::SessionStore;
