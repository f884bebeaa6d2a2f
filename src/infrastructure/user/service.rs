//! User service for registration and user lifecycle management

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::registration::{
    RegistrationError, RegistrationRequest, RegistrationRules, RegistrationValidator,
};
use crate::domain::user::{normalize_phone, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_registration;

use super::password::PasswordHasher;

/// User service for registration and management
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    validator: RegistrationValidator,
}

impl UserService {
    /// Create a new user service with the standard registration chain
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self::with_rules(repository, hasher, RegistrationRules::default())
    }

    /// Create a new user service with custom registration rules
    pub fn with_rules(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        rules: RegistrationRules,
    ) -> Self {
        let validator = RegistrationValidator::with_rules(repository.clone(), rules);

        Self {
            repository,
            hasher,
            validator,
        }
    }

    /// Register a new user
    ///
    /// Runs the validation chain, hashes the password and persists the user.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<User, RegistrationError> {
        let result = self.try_register(request).await;

        match &result {
            Ok(user) => {
                info!(user_id = %user.id(), "User registered");
                record_registration("created");
            }
            Err(err) => {
                match err.code() {
                    Some(code) => warn!(code = code.as_u32(), error = %err, "Registration rejected"),
                    None => warn!(error = %err, "Registration failed"),
                }
                record_registration(&err.outcome());
            }
        }

        result
    }

    async fn try_register(&self, request: &RegistrationRequest) -> Result<User, RegistrationError> {
        self.validator.validate(request).await?;

        if request.password.is_empty() {
            return Err(RegistrationError::EmptyPassword);
        }

        let password_hash = self
            .hasher
            .hash(request.password.expose())
            .map_err(RegistrationError::Internal)?;
        let phone = normalize_phone(&request.phone);
        let user = User::new(&phone, request.name.clone(), password_hash);

        // A concurrent registration may have claimed the phone or name
        // between the checks and the insert.
        self.repository.create(user).await.map_err(|e| match e.conflict_field() {
            Some("name") => {
                RegistrationError::NameTaken(request.name.clone().unwrap_or_default())
            }
            Some("phone") => RegistrationError::PhoneTaken(phone),
            _ => RegistrationError::Storage(e),
        })
    }

    /// Get an active user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::parse(id)?;
        self.repository.get(&user_id).await
    }

    /// Check a password against the user's stored hash
    pub fn verify_password(&self, user: &User, password: &str) -> bool {
        self.hasher.verify(password, user.password_hash())
    }

    /// Count users, optionally including trashed ones
    pub async fn count(&self, include_trashed: bool) -> Result<usize, DomainError> {
        self.repository.count(include_trashed).await
    }

    /// Move a user to the trash
    pub async fn trash(&self, id: &UserId) -> Result<(), DomainError> {
        if !self.repository.soft_delete(id).await? {
            return Err(DomainError::not_found(format!("Active user '{}' not found", id)));
        }

        info!(user_id = %id, "User trashed");
        Ok(())
    }

    /// Restore a trashed user
    pub async fn restore(&self, id: &UserId) -> Result<(), DomainError> {
        if !self.repository.restore(id).await? {
            return Err(DomainError::not_found(format!("Trashed user '{}' not found", id)));
        }

        info!(user_id = %id, "User restored");
        Ok(())
    }

    /// Permanently remove a user
    pub async fn purge(&self, id: &UserId) -> Result<bool, DomainError> {
        let removed = self.repository.force_delete(id).await?;

        if removed {
            info!(user_id = %id, "User purged");
        }

        Ok(removed)
    }

    /// Permanently remove every user holding the phone or the name
    pub async fn purge_matching(&self, phone: &str, name: &str) -> Result<usize, DomainError> {
        let removed = self.repository.force_delete_matching(phone, name).await?;
        info!(removed, "Users purged by phone/name");
        Ok(removed)
    }
}
