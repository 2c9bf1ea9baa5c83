//! Authentication error types.

use thiserror::Error;

use super::hasher::HashError;
use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field is missing or empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] toko_core::EmailError),

    /// Unknown email or wrong password; the two are never distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password hashing error.
    #[error("password hashing error: {0}")]
    PasswordHash(#[from] HashError),

    /// Session token could not be issued.
    #[error("token issuance error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Whether the caller caused this error (as opposed to infrastructure).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidEmail(_)
                | Self::InvalidCredentials
                | Self::UserAlreadyExists
        )
    }
}
