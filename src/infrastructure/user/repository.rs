//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// phone -> user ID, covers trashed users
    phone_index: HashMap<String, UserId>,
    /// name -> user ID, covers trashed users
    name_index: HashMap<String, UserId>,
}

impl Tables {
    fn remove(&mut self, id: &UserId) -> Option<User> {
        let user = self.users.remove(id)?;
        self.phone_index.remove(user.phone());
        if let Some(name) = user.name() {
            self.name_index.remove(name);
        }
        Some(user)
    }

    fn lookup(&self, index: &HashMap<String, UserId>, key: &str) -> Option<User> {
        index.get(key).and_then(|id| self.users.get(id)).cloned()
    }
}

/// In-memory implementation of UserRepository
///
/// All tables sit behind one lock so uniqueness checks and inserts are atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).filter(|u| !u.is_trashed()).cloned())
    }

    async fn get_with_trashed(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.lookup(&tables.phone_index, phone))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.lookup(&tables.name_index, name))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        let id = *user.id();

        if tables.users.contains_key(&id) {
            return Err(DomainError::conflict(
                "id",
                format!("User with ID '{}' already exists", id),
            ));
        }

        if let Some(name) = user.name() {
            if tables.name_index.contains_key(name) {
                return Err(DomainError::conflict(
                    "name",
                    format!("Name '{}' already exists", name),
                ));
            }
        }

        if tables.phone_index.contains_key(user.phone()) {
            return Err(DomainError::conflict(
                "phone",
                format!("Phone '{}' already exists", user.phone()),
            ));
        }

        tables.phone_index.insert(user.phone().to_string(), id);
        if let Some(name) = user.name() {
            tables.name_index.insert(name.to_string(), id);
        }
        tables.users.insert(id, user.clone());

        Ok(user)
    }

    async fn soft_delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(id).is_some_and(User::trash))
    }

    async fn restore(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(id).is_some_and(User::restore))
    }

    async fn force_delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        Ok(tables.remove(id).is_some())
    }

    async fn force_delete_matching(&self, phone: &str, name: &str) -> Result<usize, DomainError> {
        let mut tables = self.tables.write().await;

        let mut ids: Vec<UserId> = Vec::with_capacity(2);
        ids.extend(tables.phone_index.get(phone).copied());
        if let Some(id) = tables.name_index.get(name).copied() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        Ok(ids.iter().filter(|id| tables.remove(id).is_some()).count())
    }

    async fn count(&self, include_trashed: bool) -> Result<usize, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .users
            .values()
            .filter(|u| include_trashed || !u.is_trashed())
            .count())
    }
}
