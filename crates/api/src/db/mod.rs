//! Storage for users and products.
//!
//! # Tables
//!
//! - `users` - Accounts (username, email, password hash)
//! - `products` - Product catalog
//!
//! # Stores
//!
//! Services never talk to a database directly. They receive an
//! [`UserStore`] and a [`ProductStore`] at construction time:
//!
//! - [`UserRepository`] / [`ProductRepository`] - `PostgreSQL` via `sqlx`
//! - [`MemoryUserStore`] / [`MemoryProductStore`] - in-process, for tests
//!   and local development
//!
//! Each store call is a single atomic statement; no operation spans rows.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p toko-cli -- migrate
//! ```
//! or at server startup with `TOKO_RUN_MIGRATIONS=true`.

pub mod memory;
pub mod products;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use toko_core::{Email, ProductId, UserId};

use crate::models::product::{Product, ProductDraft};
use crate::models::user::{NewUser, User};

pub use memory::{MemoryProductStore, MemoryUserStore};
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return the assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn create(&self, user: &NewUser) -> Result<UserId, RepositoryError>;

    /// Look up the user registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if storage fails; absence is `Ok(None)`.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Product catalog storage.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, ordered by id.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// A single product, or `None` if it does not exist.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product and return it with its assigned id.
    async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError>;

    /// Replace every field of an existing product.
    ///
    /// Returns `None` without writing anything if `id` does not exist.
    async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Remove a product. Returns `false` if it did not exist.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded migrations, creating the schema if it does not exist.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a unique-violation into `RepositoryError::Conflict`.
fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
