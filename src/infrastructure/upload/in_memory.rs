//! In-memory upload store

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{check_image, check_size, public_url, stored_name};
use crate::domain::upload::{UploadRequest, UploadStore, UploadedFile};
use crate::domain::DomainError;

/// Keeps uploaded bytes in memory
#[derive(Debug)]
pub struct InMemoryUploadStore {
    files: Arc<RwLock<HashMap<Uuid, Bytes>>>,
    public_prefix: String,
    max_size_bytes: u64,
}

impl InMemoryUploadStore {
    pub fn new(public_prefix: impl Into<String>, max_size_bytes: u64) -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            public_prefix: public_prefix.into(),
            max_size_bytes,
        }
    }

    /// Bytes of a stored upload
    pub async fn get(&self, id: Uuid) -> Option<Bytes> {
        self.files.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl UploadStore for InMemoryUploadStore {
    async fn store(&self, request: UploadRequest) -> Result<UploadedFile, DomainError> {
        check_size(&request, self.max_size_bytes)?;
        check_image(&request)?;

        let id = Uuid::new_v4();
        let name = stored_name(id, &request);

        self.files.write().await.insert(id, request.bytes.clone());

        Ok(UploadedFile {
            id,
            content_type: request.resolved_content_type(),
            size: request.size(),
            url: public_url(&self.public_prefix, &name),
            original_name: request.file_name,
        })
    }

    async fn remove(&self, file: &UploadedFile) -> Result<bool, DomainError> {
        Ok(self.files.write().await.remove(&file.id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_get() {
        let store = InMemoryUploadStore::new("/uploads", 1024);

        let stored = store
            .store(UploadRequest::new("avatar.gif", b"hello".to_vec()))
            .await
            .unwrap();

        assert_eq!(stored.content_type, "image/gif");
        assert_eq!(stored.url, format!("/uploads/{}.gif", stored.id));
        assert_eq!(store.get(stored.id).await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_store_rejects_non_image() {
        let store = InMemoryUploadStore::new("/uploads", 1024);

        let result = store.store(UploadRequest::new("notes.txt", b"hello".to_vec())).await;
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
        assert!(store.files.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryUploadStore::new("/uploads", 1024);

        let stored = store
            .store(UploadRequest::new("avatar.png", b"png".to_vec()))
            .await
            .unwrap();

        assert!(store.remove(&stored).await.unwrap());
        assert!(!store.remove(&stored).await.unwrap());
        assert!(store.get(stored.id).await.is_none());
    }

    #[tokio::test]
    async fn test_store_rejects_empty_file() {
        let store = InMemoryUploadStore::new("/uploads", 1024);

        let result = store.store(UploadRequest::new("empty.png", Vec::<u8>::new())).await;
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }
}
