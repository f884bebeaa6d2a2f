//! Public user representation

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::User;

/// User fields safe to return to clients
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            phone: user.phone().to_string(),
            name: user.name().map(String::from),
            email: user.email().to_string(),
            created_at: user.created_at(),
        }
    }
}
