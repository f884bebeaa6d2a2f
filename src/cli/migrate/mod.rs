//! Migrate command - applies or reverts PostgreSQL schema migrations

use anyhow::Context;
use tracing::info;

use crate::config::StorageBackend;
use crate::infrastructure::logging::init_logging;
use super::MigrateArgs;
use crate::infrastructure::storage::{
    revert_last_storage_migration, run_storage_migrations, PostgresMigrator,
};

/// Apply every pending migration to the configured database, or with
/// `--revert` roll back the latest one
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::load_config();
    init_logging(&config.logging);

    if config.storage.backend != StorageBackend::Postgres {
        info!("Storage backend is not postgres, migrations still target storage.database_url");
    }

    let pool = config
        .storage
        .postgres()?
        .connect()
        .await
        .context("connecting to the database")?;

    if args.revert {
        let reverted = revert_last_storage_migration(&pool).await?;
        let version = PostgresMigrator::new(pool.clone()).current_version().await?;

        info!(reverted = ?reverted, version = ?version, "Revert complete");
    } else {
        let applied = run_storage_migrations(&pool).await?;
        let version = PostgresMigrator::new(pool.clone()).current_version().await?;

        info!(applied, version = ?version, "Migrations complete");
    }

    pool.close().await;
    Ok(())
}
