//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("{field} must be at least {min} and less than {max} characters long (got {actual})")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("{field} has an invalid format")]
    InvalidFormat { field: &'static str },
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::invalid_argument(err.to_string())
    }
}

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 10;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 30;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+@.+$").unwrap());

/// Validate that `value` has a length in `[min, max)`
///
/// Length is counted in characters, not bytes.
pub fn validate_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), UserValidationError> {
    let actual = value.chars().count();

    if actual < min || actual >= max {
        return Err(UserValidationError::InvalidLength {
            field,
            min,
            max,
            actual,
        });
    }

    Ok(())
}

/// Validate that `value` matches `pattern` somewhere
pub fn validate_pattern(
    field: &'static str,
    value: &str,
    pattern: &Regex,
) -> Result<(), UserValidationError> {
    if !pattern.is_match(value) {
        return Err(UserValidationError::InvalidFormat { field });
    }

    Ok(())
}

/// Validate a display name: 2 to 9 characters
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    validate_length("name", name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)
}

/// Validate a password: 8 to 29 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    validate_length("password", password, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)
}

/// Validate an email: something, an `@`, something
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    validate_pattern("email", email, &EMAIL_PATTERN)
}

/// Validate every field a new user needs, in declaration order
pub fn validate_user_fields(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), UserValidationError> {
    validate_name(name)?;
    validate_password(password)?;
    validate_email(email)
}
