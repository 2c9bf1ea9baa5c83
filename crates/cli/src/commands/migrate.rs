//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded into the
//! binary, so `toko migrate` needs only `TOKO_DATABASE_URL`.

use super::{CliError, connect};

/// Apply every pending migration.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let (_, pool) = connect().await?;

    tracing::info!("Running migrations...");
    toko_api::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
