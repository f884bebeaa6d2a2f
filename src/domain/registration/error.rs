//! Registration failures and their message codes

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::domain::user::UserValidationError;
use crate::domain::DomainError;

/// Client-facing message codes for registration failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageCode {
    /// Phone number missing or not a mobile number
    InvalidPhone = 1000,
    /// Username missing, too short or too long
    InvalidNameLength = 1002,
    /// Username contains disallowed characters
    InvalidNameCharset = 1003,
    NameTaken = 1004,
    PhoneTaken = 1010,
    DeviceCodeMissing = 1014,
}

impl MessageCode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl std::fmt::Display for MessageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl Serialize for MessageCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

pub const DEVICE_CODE_MISSING_MESSAGE: &str = "device code must not be empty";
pub const EMPTY_PASSWORD_MESSAGE: &str = "password must not be empty";

/// Errors produced while registering a user
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistrationError {
    #[error("{}", DEVICE_CODE_MISSING_MESSAGE)]
    DeviceCodeMissing,

    #[error("Invalid phone: {0}")]
    InvalidPhone(UserValidationError),

    #[error("Invalid username length: {0}")]
    InvalidNameLength(UserValidationError),

    #[error("Invalid username: {0}")]
    InvalidNameCharset(UserValidationError),

    #[error("Username '{0}' is already taken")]
    NameTaken(String),

    #[error("Phone '{0}' is already registered")]
    PhoneTaken(String),

    /// Raised only once every stage has passed
    #[error("password must not be empty")]
    EmptyPassword,

    #[error(transparent)]
    Storage(#[from] DomainError),

    /// Failure outside the user store, e.g. password hashing
    #[error("Registration failed: {0}")]
    Internal(DomainError),
}

impl RegistrationError {
    /// Message code reported to the client, if this is a validation failure
    pub fn code(&self) -> Option<MessageCode> {
        match self {
            Self::DeviceCodeMissing => Some(MessageCode::DeviceCodeMissing),
            Self::InvalidPhone(_) => Some(MessageCode::InvalidPhone),
            Self::InvalidNameLength(_) => Some(MessageCode::InvalidNameLength),
            Self::InvalidNameCharset(_) => Some(MessageCode::InvalidNameCharset),
            Self::NameTaken(_) => Some(MessageCode::NameTaken),
            Self::PhoneTaken(_) => Some(MessageCode::PhoneTaken),
            Self::EmptyPassword | Self::Storage(_) | Self::Internal(_) => None,
        }
    }

    /// Label for the `registrations_total` outcome metric
    pub fn outcome(&self) -> String {
        match self {
            Self::EmptyPassword => "empty_password".to_string(),
            Self::Storage(_) => "storage_error".to_string(),
            Self::Internal(_) => "internal_error".to_string(),
            coded => coded.code().map(|c| c.to_string()).unwrap_or_default(),
        }
    }

    /// Message sent alongside the code. Most failures carry the code only.
    pub fn public_message(&self) -> Option<&'static str> {
        match self {
            Self::DeviceCodeMissing => Some(DEVICE_CODE_MISSING_MESSAGE),
            Self::EmptyPassword => Some(EMPTY_PASSWORD_MESSAGE),
            _ => None,
        }
    }
}
