//! Upload store trait

use async_trait::async_trait;

use super::entity::{UploadRequest, UploadedFile};
use crate::domain::DomainError;

/// Collaborator that persists uploaded files and describes them
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store the file and return its metadata
    async fn store(&self, request: UploadRequest) -> Result<UploadedFile, DomainError>;

    /// Discard a stored file, returning whether anything was removed
    async fn remove(&self, file: &UploadedFile) -> Result<bool, DomainError>;
}
