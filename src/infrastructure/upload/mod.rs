//! Upload infrastructure: local filesystem and in-memory stores

mod in_memory;
mod local;

pub use in_memory::InMemoryUploadStore;
pub use local::LocalUploadStore;

use crate::domain::upload::{UploadRequest, UploadedFile};
use crate::domain::DomainError;

/// Extensions accepted for profile images
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Content types accepted for profile images
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Reject empty files and files above `max_size_bytes`
fn check_size(request: &UploadRequest, max_size_bytes: u64) -> Result<(), DomainError> {
    let size = request.size();

    if size == 0 {
        return Err(DomainError::invalid_argument(format!(
            "Uploaded file '{}' is empty",
            request.file_name
        )));
    }

    if size > max_size_bytes {
        return Err(DomainError::invalid_argument(format!(
            "Uploaded file '{}' is {} bytes, limit is {}",
            request.file_name, size, max_size_bytes
        )));
    }

    Ok(())
}

/// Reject anything that is not a raster image by both extension and content type
///
/// Stored files are served from the API origin with a type derived from their
/// extension, so markup or script extensions must never reach the store.
fn check_image(request: &UploadRequest) -> Result<(), DomainError> {
    let extension = request.extension().unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(DomainError::invalid_argument(format!(
            "Uploaded file '{}' must be one of: {}",
            request.file_name,
            IMAGE_EXTENSIONS.join(", ")
        )));
    }

    let content_type = request.resolved_content_type();
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !IMAGE_CONTENT_TYPES.contains(&essence.as_str()) {
        return Err(DomainError::invalid_argument(format!(
            "Uploaded file '{}' has unsupported content type '{}'",
            request.file_name, content_type
        )));
    }

    Ok(())
}

/// Name of the stored object: `<uuid>` plus the original extension if any
fn stored_name(id: uuid::Uuid, request: &UploadRequest) -> String {
    match request.extension() {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

fn public_url(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), name)
}

/// Recover the stored object name from a file's URL
///
/// Only names this module produced are accepted: the file id, optionally
/// followed by an alphanumeric extension.
fn stored_name_of(file: &UploadedFile) -> Option<&str> {
    let name = file.url.rsplit('/').next()?;
    let id = file.id.to_string();
    let rest = name.strip_prefix(id.as_str())?;

    match rest.strip_prefix('.') {
        None if rest.is_empty() => Some(name),
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Some(name)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_check_size() {
        assert!(check_size(&UploadRequest::new("a.png", vec![1u8; 4]), 4).is_ok());
        assert!(matches!(
            check_size(&UploadRequest::new("a.png", Vec::<u8>::new()), 4),
            Err(DomainError::InvalidArgument { .. })
        ));
        assert!(matches!(
            check_size(&UploadRequest::new("a.png", vec![1u8; 5]), 4),
            Err(DomainError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_check_image_accepts_common_formats() {
        for name in ["a.png", "a.JPG", "a.jpeg", "a.gif", "a.webp"] {
            assert!(check_image(&UploadRequest::new(name, vec![1u8])).is_ok(), "{}", name);
        }
        assert!(check_image(
            &UploadRequest::new("a.png", vec![1u8]).with_content_type("image/png; charset=binary")
        )
        .is_ok());
    }

    #[test]
    fn test_check_image_rejects_markup_and_scripts() {
        for name in ["page.html", "page.htm", "icon.svg", "run.js", "notes.txt", "README"] {
            assert!(
                matches!(
                    check_image(&UploadRequest::new(name, vec![1u8])),
                    Err(DomainError::InvalidArgument { .. })
                ),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_check_image_rejects_mismatched_content_type() {
        let disguised = UploadRequest::new("a.png", vec![1u8]).with_content_type("text/html");
        assert!(matches!(
            check_image(&disguised),
            Err(DomainError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_stored_name_of_only_accepts_own_names() {
        let id = Uuid::new_v4();
        let file = |url: String| UploadedFile {
            id,
            original_name: "a.png".to_string(),
            content_type: "image/png".to_string(),
            size: 1,
            url,
        };

        let own = file(format!("/uploads/{}.png", id));
        assert_eq!(stored_name_of(&own), Some(format!("{}.png", id).as_str()));

        let bare = file(format!("/uploads/{}", id));
        assert_eq!(stored_name_of(&bare), Some(id.to_string().as_str()));

        assert_eq!(stored_name_of(&file("/uploads/../secret".to_string())), None);
        assert_eq!(stored_name_of(&file(format!("/uploads/{}.p/ng", id))), None);
        assert_eq!(stored_name_of(&file(format!("/uploads/{}..", id))), None);
        assert_eq!(stored_name_of(&file(format!("/uploads/{}x", id))), None);
    }

    #[test]
    fn test_stored_name_keeps_extension() {
        let id = Uuid::new_v4();

        assert_eq!(
            stored_name(id, &UploadRequest::new("Me.PNG", vec![1u8])),
            format!("{}.png", id)
        );
        assert_eq!(
            stored_name(id, &UploadRequest::new("README", vec![1u8])),
            id.to_string()
        );
    }

    #[test]
    fn test_public_url() {
        assert_eq!(public_url("/uploads/", "a.png"), "/uploads/a.png");
        assert_eq!(public_url("/uploads", "a.png"), "/uploads/a.png");
    }
}
