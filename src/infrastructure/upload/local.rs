//! Upload store writing to a local directory

use async_trait::async_trait;
use std::path::PathBuf;
use std::io::ErrorKind;
use tracing::debug;
use uuid::Uuid;

use super::{check_image, check_size, public_url, stored_name, stored_name_of};
use crate::domain::upload::{UploadRequest, UploadStore, UploadedFile};
use crate::domain::DomainError;

/// Stores uploads as `<directory>/<uuid>.<ext>`
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    directory: PathBuf,
    public_prefix: String,
    max_size_bytes: u64,
}

impl LocalUploadStore {
    pub fn new(
        directory: impl Into<PathBuf>,
        public_prefix: impl Into<String>,
        max_size_bytes: u64,
    ) -> Self {
        Self {
            directory: directory.into(),
            public_prefix: public_prefix.into(),
            max_size_bytes,
        }
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn store(&self, request: UploadRequest) -> Result<UploadedFile, DomainError> {
        check_size(&request, self.max_size_bytes)?;
        check_image(&request)?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create upload directory: {}", e)))?;

        let id = Uuid::new_v4();
        let name = stored_name(id, &request);
        let path = self.directory.join(&name);

        tokio::fs::write(&path, &request.bytes)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write upload: {}", e)))?;

        debug!(path = %path.display(), size = request.size(), "Stored upload");

        Ok(UploadedFile {
            id,
            content_type: request.resolved_content_type(),
            size: request.size(),
            url: public_url(&self.public_prefix, &name),
            original_name: request.file_name,
        })
    }

    async fn remove(&self, file: &UploadedFile) -> Result<bool, DomainError> {
        let Some(name) = stored_name_of(file) else {
            return Ok(false);
        };
        let path = self.directory.join(name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed upload");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::storage(format!("Failed to remove upload: {}", e))),
        }
    }
}
