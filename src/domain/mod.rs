//! Domain layer - Core business logic and entities

pub mod error;
pub mod registration;
pub mod user;

pub use error::DomainError;
pub use registration::{
    MessageCode, RegistrationError, RegistrationRequest, RegistrationRules, RegistrationValidator,
};
pub use user::{User, UserId, UserRepository};
