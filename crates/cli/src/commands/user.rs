//! User management commands.
//!
//! Goes through the same auth service as `POST /register`, so validation,
//! hashing and the duplicate-email check are identical.

use secrecy::SecretString;

use toko_api::services::auth::Registration;

use super::{CliError, app_state};

/// Register a new user.
///
/// # Errors
///
/// Returns an error if the input is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create(username: String, email: String, password: SecretString) -> Result<(), CliError> {
    let state = app_state().await?;

    let id = state
        .auth()
        .register(Registration {
            username,
            email,
            password,
        })
        .await?;

    tracing::info!(user_id = %id, "User created");
    Ok(())
}
