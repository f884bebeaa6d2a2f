//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// User identifier - a UUID rendered in its hyphenated form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|e| DomainError::validation(format!("Invalid user ID '{}': {}", id, e)))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User entity created by phone registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    /// Mobile number, unique among all non-purged users
    phone: String,
    /// Display/login name, unique when present
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// May be empty for phone registrations
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Set while the user is trashed; cleared on restore
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted_at: Option<DateTime<Utc>>,
}

/// Stored column values used to rebuild a `User` from persistence
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub phone: String,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new, active user
    pub fn new(
        phone: impl Into<String>,
        name: Option<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::generate(),
            phone: phone.into(),
            name,
            email: String::new(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Rebuild a user from stored columns
    pub fn from_record(record: UserRecord) -> Self {
        Self {
            id: record.id,
            phone: record.phone,
            name: record.name,
            email: record.email,
            password_hash: record.password_hash,
            created_at: record.created_at,
            updated_at: record.updated_at,
            deleted_at: record.deleted_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Check if the user is in the trashed state
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    // Mutators

    /// Move the user to the trash. Returns false if already trashed.
    pub fn trash(&mut self) -> bool {
        if self.is_trashed() {
            return false;
        }

        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Bring a trashed user back. Returns false if the user was not trashed.
    pub fn restore(&mut self) -> bool {
        if !self.is_trashed() {
            return false;
        }

        self.deleted_at = None;
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
