//! Registration domain
//!
//! The registration contract: an ordered chain of checks over a
//! `RegistrationRequest`, each failing with a single coded error.

mod error;
mod request;
mod stage;
mod validator;

pub use error::{
    MessageCode, RegistrationError, DEVICE_CODE_MISSING_MESSAGE, EMPTY_PASSWORD_MESSAGE,
};
pub use request::{Password, RegistrationRequest};
pub use stage::{
    DeviceCodeStage, NameCharsetStage, NameLengthStage, NameUniqueStage, PhoneFormatStage,
    PhoneUniqueStage, RegistrationStage,
};
pub use validator::{RegistrationRules, RegistrationValidator};
