//! Application state for shared services

use std::sync::Arc;

use crate::domain::registration::{RegistrationError, RegistrationRequest};
use crate::domain::{DomainError, User};
use crate::infrastructure::user::UserService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }
}

/// User operations reachable from HTTP handlers
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: &RegistrationRequest) -> Result<User, RegistrationError>;
    async fn count(&self, include_trashed: bool) -> Result<usize, DomainError>;
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, request: &RegistrationRequest) -> Result<User, RegistrationError> {
        UserService::register(self, request).await
    }

    async fn count(&self, include_trashed: bool) -> Result<usize, DomainError> {
        UserService::count(self, include_trashed).await
    }
}
