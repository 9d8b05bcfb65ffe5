//! Upload domain
//!
//! Metadata for files attached to user profiles and the store trait that
//! produces it.

mod entity;
mod store;

pub use entity::{UploadRequest, UploadedFile};
pub use store::UploadStore;
