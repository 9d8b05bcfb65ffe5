use thiserror::Error;

/// Core domain errors
///
/// `InvalidArgument`, `NotFound`, `Unauthorized` and `Conflict` form the
/// user-error family: deterministic outcomes of the caller's input. `Storage`
/// and `Internal` are system faults raised by collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the user-error family
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::NotFound { .. }
                | Self::Unauthorized { .. }
                | Self::Conflict { .. }
        )
    }

    /// Message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument { message }
            | Self::NotFound { message }
            | Self::Unauthorized { message }
            | Self::Conflict { message }
            | Self::Storage { message }
            | Self::Internal { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User '7' not found");
        assert_eq!(error.to_string(), "Not found: User '7' not found");
    }

    #[test]
    fn test_invalid_argument_error() {
        let error = DomainError::invalid_argument("name is too short");
        assert_eq!(error.to_string(), "Invalid argument: name is too short");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email 'dup@x.com' already exists");
        assert_eq!(error.to_string(), "Conflict: Email 'dup@x.com' already exists");
    }

    #[test]
    fn test_user_error_family() {
        assert!(DomainError::invalid_argument("x").is_user_error());
        assert!(DomainError::not_found("x").is_user_error());
        assert!(DomainError::unauthorized("x").is_user_error());
        assert!(DomainError::conflict("x").is_user_error());
        assert!(!DomainError::storage("x").is_user_error());
        assert!(!DomainError::internal("x").is_user_error());
    }

    #[test]
    fn test_message_strips_kind() {
        let error = DomainError::unauthorized("Not the owner");
        assert_eq!(error.message(), "Not the owner");
    }
}
