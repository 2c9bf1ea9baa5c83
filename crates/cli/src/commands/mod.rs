//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use thiserror::Error;

use toko_api::config::{ApiConfig, ConfigError};
use toko_api::db;
use toko_api::services::auth::{Argon2Hasher, AuthError};
use toko_api::state::AppState;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} of {1} products failed to seed")]
    SeedFailures(usize, usize),
}

/// Load configuration and connect to the database.
async fn connect() -> Result<(ApiConfig, sqlx::PgPool), CliError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;

    Ok((config, pool))
}

/// Build Postgres-backed application services.
async fn app_state() -> Result<AppState, CliError> {
    let (config, pool) = connect().await?;
    let params = config
        .hashing
        .params()
        .map_err(|e| ConfigError::InvalidEnvVar("TOKO_ARGON2_*".to_owned(), e))?;

    Ok(AppState::postgres(pool, Argon2Hasher::new(params)))
}
