//! User domain
//!
//! This module provides the user entity, the field validation rules it
//! enforces, and the repository trait the persistence layer implements.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_length, validate_name, validate_password, validate_pattern,
    validate_user_fields, UserValidationError, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH,
    MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};

#[cfg(test)]
pub use repository::MockUserRepository;
