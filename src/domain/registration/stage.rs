//! Individual registration checks
//!
//! Each stage inspects the request (and, for uniqueness, the user store)
//! and either passes or fails with exactly one `RegistrationError`.

use async_trait::async_trait;
use std::fmt::Debug;

use super::error::RegistrationError;
use super::request::RegistrationRequest;
use crate::domain::user::{
    normalize_phone, validate_name_charset, validate_name_length, validate_phone, NameLengthRule,
    UserRepository,
};

/// A single check in the registration chain
#[async_trait]
pub trait RegistrationStage: Send + Sync + Debug {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Run the check against the request
    async fn check(
        &self,
        request: &RegistrationRequest,
        users: &dyn UserRepository,
    ) -> Result<(), RegistrationError>;
}

/// Rejects requests without a device code
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceCodeStage;

#[async_trait]
impl RegistrationStage for DeviceCodeStage {
    fn name(&self) -> &'static str {
        "device_code"
    }

    async fn check(
        &self,
        request: &RegistrationRequest,
        _users: &dyn UserRepository,
    ) -> Result<(), RegistrationError> {
        if request.device_code.trim().is_empty() {
            return Err(RegistrationError::DeviceCodeMissing);
        }
        Ok(())
    }
}

/// Rejects empty or malformed phone numbers
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneFormatStage;

#[async_trait]
impl RegistrationStage for PhoneFormatStage {
    fn name(&self) -> &'static str {
        "phone_format"
    }

    async fn check(
        &self,
        request: &RegistrationRequest,
        _users: &dyn UserRepository,
    ) -> Result<(), RegistrationError> {
        validate_phone(&request.phone).map_err(RegistrationError::InvalidPhone)
    }
}

/// Requires a name whose length is within bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct NameLengthStage {
    rule: NameLengthRule,
}

impl NameLengthStage {
    pub fn new(rule: NameLengthRule) -> Self {
        Self { rule }
    }
}

#[async_trait]
impl RegistrationStage for NameLengthStage {
    fn name(&self) -> &'static str {
        "name_length"
    }

    async fn check(
        &self,
        request: &RegistrationRequest,
        _users: &dyn UserRepository,
    ) -> Result<(), RegistrationError> {
        let name = request.name.as_deref().unwrap_or_default();
        validate_name_length(name, self.rule).map_err(RegistrationError::InvalidNameLength)
    }
}

/// Rejects names with disallowed characters; absent names pass
#[derive(Debug, Clone, Copy, Default)]
pub struct NameCharsetStage;

#[async_trait]
impl RegistrationStage for NameCharsetStage {
    fn name(&self) -> &'static str {
        "name_charset"
    }

    async fn check(
        &self,
        request: &RegistrationRequest,
        _users: &dyn UserRepository,
    ) -> Result<(), RegistrationError> {
        match request.name.as_deref() {
            Some(name) => {
                validate_name_charset(name).map_err(RegistrationError::InvalidNameCharset)
            }
            None => Ok(()),
        }
    }
}

/// Rejects names already reserved by a stored user
#[derive(Debug, Clone, Copy, Default)]
pub struct NameUniqueStage;

#[async_trait]
impl RegistrationStage for NameUniqueStage {
    fn name(&self) -> &'static str {
        "name_unique"
    }

    async fn check(
        &self,
        request: &RegistrationRequest,
        users: &dyn UserRepository,
    ) -> Result<(), RegistrationError> {
        if let Some(name) = request.name.as_deref() {
            if users.name_exists(name).await? {
                return Err(RegistrationError::NameTaken(name.to_string()));
            }
        }
        Ok(())
    }
}

/// Rejects phone numbers already reserved by a stored user
///
/// Prefixed spellings (`86…`, `+86…`) are compared in national form.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneUniqueStage;

#[async_trait]
impl RegistrationStage for PhoneUniqueStage {
    fn name(&self) -> &'static str {
        "phone_unique"
    }

    async fn check(
        &self,
        request: &RegistrationRequest,
        users: &dyn UserRepository,
    ) -> Result<(), RegistrationError> {
        if users.phone_exists(&normalize_phone(&request.phone)).await? {
            return Err(RegistrationError::PhoneTaken(request.phone.clone()));
        }
        Ok(())
    }
}
