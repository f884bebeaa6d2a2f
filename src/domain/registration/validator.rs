//! Ordered registration validator

use std::sync::Arc;

use tracing::debug;

use super::error::RegistrationError;
use super::request::RegistrationRequest;
use super::stage::{
    DeviceCodeStage, NameCharsetStage, NameLengthStage, NameUniqueStage, PhoneFormatStage,
    PhoneUniqueStage, RegistrationStage,
};
use crate::domain::user::{NameLengthRule, UserRepository};

/// Tunable registration rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationRules {
    pub name_length: NameLengthRule,
}

/// Runs registration stages in order and stops at the first failure
#[derive(Debug)]
pub struct RegistrationValidator {
    stages: Vec<Box<dyn RegistrationStage>>,
    users: Arc<dyn UserRepository>,
}

impl RegistrationValidator {
    /// Standard chain with default rules
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self::with_rules(users, RegistrationRules::default())
    }

    /// Standard chain:
    /// device code, phone format, name length, name charset,
    /// name uniqueness, phone uniqueness
    pub fn with_rules(users: Arc<dyn UserRepository>, rules: RegistrationRules) -> Self {
        Self::empty(users)
            .with_stage(DeviceCodeStage)
            .with_stage(PhoneFormatStage)
            .with_stage(NameLengthStage::new(rules.name_length))
            .with_stage(NameCharsetStage)
            .with_stage(NameUniqueStage)
            .with_stage(PhoneUniqueStage)
    }

    /// A validator with no stages
    pub fn empty(users: Arc<dyn UserRepository>) -> Self {
        Self {
            stages: Vec::new(),
            users,
        }
    }

    /// Append a stage to the end of the chain
    pub fn with_stage(mut self, stage: impl RegistrationStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Validate a request, returning the first failing stage's error
    pub async fn validate(&self, request: &RegistrationRequest) -> Result<(), RegistrationError> {
        for stage in &self.stages {
            if let Err(err) = stage.check(request, self.users.as_ref()).await {
                debug!(stage = stage.name(), error = %err, "Registration check failed");
                return Err(err);
            }
        }

        Ok(())
    }
}
