//! User domain
//!
//! This module provides domain types and traits for registered users,
//! including the user entity, field validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserRecord};
pub use repository::UserRepository;
pub use validation::{
    normalize_phone, validate_name_charset, validate_name_length, validate_phone, NameLengthRule,
    UserValidationError, DEFAULT_MAX_NAME_LENGTH, DEFAULT_MIN_NAME_LENGTH,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
