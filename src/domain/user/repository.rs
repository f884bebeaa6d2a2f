//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Lookups by phone or name include trashed users: a trashed user keeps
/// its phone and name reserved until it is force-deleted.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get an active user by ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by ID, including trashed users
    async fn get_with_trashed(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by phone number, including trashed users
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by name, including trashed users
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user, failing with a conflict if phone or name is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Soft-delete a user. Returns false if missing or already trashed.
    async fn soft_delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Restore a trashed user. Returns false if missing or not trashed.
    async fn restore(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Permanently remove a user, trashed or not
    async fn force_delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Permanently remove every user matching the phone or the name
    async fn force_delete_matching(&self, phone: &str, name: &str) -> Result<usize, DomainError>;

    /// Count users, optionally including trashed ones
    async fn count(&self, include_trashed: bool) -> Result<usize, DomainError>;

    /// Check if a phone number is reserved
    async fn phone_exists(&self, phone: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_phone(phone).await?.is_some())
    }

    /// Check if a name is reserved
    async fn name_exists(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_name(name).await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::infrastructure::user::InMemoryUserRepository;

    /// Repository wrapper that can be switched into a failing mode
    #[derive(Debug, Default)]
    pub struct MockUserRepository {
        inner: InMemoryUserRepository,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockUserRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set whether operations should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock repository configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            self.inner.get(id).await
        }

        async fn get_with_trashed(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            self.inner.get_with_trashed(id).await
        }

        async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            self.inner.find_by_phone(phone).await
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<User>, DomainError> {
            self.check_should_fail().await?;
            self.inner.find_by_name(name).await
        }

        async fn create(&self, user: User) -> Result<User, DomainError> {
            self.check_should_fail().await?;
            self.inner.create(user).await
        }

        async fn soft_delete(&self, id: &UserId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            self.inner.soft_delete(id).await
        }

        async fn restore(&self, id: &UserId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            self.inner.restore(id).await
        }

        async fn force_delete(&self, id: &UserId) -> Result<bool, DomainError> {
            self.check_should_fail().await?;
            self.inner.force_delete(id).await
        }

        async fn force_delete_matching(
            &self,
            phone: &str,
            name: &str,
        ) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            self.inner.force_delete_matching(phone, name).await
        }

        async fn count(&self, include_trashed: bool) -> Result<usize, DomainError> {
            self.check_should_fail().await?;
            self.inner.count(include_trashed).await
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_passthrough() {
            let repo = MockUserRepository::new();
            repo.create(User::new("18781994583", None, "hash")).await.unwrap();

            assert!(repo.phone_exists("18781994583").await.unwrap());
            assert!(!repo.name_exists("nobody").await.unwrap());
        }

        #[tokio::test]
        async fn test_should_fail() {
            let repo = MockUserRepository::new();
            repo.set_should_fail(true).await;

            let result = repo.find_by_phone("18781994583").await;
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }
    }
}
