//! Phone number registration API
//!
//! Accepts sign-ups over HTTP and runs each request through an ordered
//! validation chain:
//! - Device code present
//! - Phone number is a mobile number
//! - Username length and character set
//! - Username and phone not already taken
//!
//! Users live in memory or in PostgreSQL.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, UserServiceTrait};
use config::StorageBackend;
use domain::UserRepository;
use infrastructure::storage::run_storage_migrations;
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let rules = config.registration.rules()?;

    info!("Storage backend: {:?}", config.storage.backend);

    let user_repository: Arc<dyn UserRepository> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryUserRepository::new()),
        StorageBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let pool = config.storage.postgres()?.connect().await?;
            info!("PostgreSQL connection established");

            let applied = run_storage_migrations(&pool).await?;
            info!(applied, "Storage migrations checked");

            Arc::new(PostgresUserRepository::new(pool))
        }
    };

    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::with_rules(
        user_repository,
        Arc::new(Argon2Hasher::new()),
        rules,
    ));

    Ok(AppState::new(user_service))
}
