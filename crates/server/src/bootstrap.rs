use ringforge_core::config::{AppConfig, ConfigError, LoadOptions};
use ringforge_db::repositories::RepositoryError;
use ringforge_db::{connect_with_settings, migrations, CatalogSeedDataset, DbPool};
use thiserror::Error;
use tracing::info;

/// Fully prepared runtime: validated config plus a migrated, seeded pool.
pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("catalog seed failed: {0}")]
    Seed(#[source] RepositoryError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Staged startup: connect, migrate, seed. The catalog seed runs here,
/// before the listener binds, so request handlers never write catalog rows.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let seeded = CatalogSeedDataset::load(&db_pool).await.map_err(BootstrapError::Seed)?;
    info!(
        event_name = "system.bootstrap.seed_applied",
        correlation_id = "bootstrap",
        stones = seeded.stones,
        settings = seeded.settings,
        metals = seeded.metals,
        "catalog seed applied"
    );

    Ok(Application { config, db_pool })
}
