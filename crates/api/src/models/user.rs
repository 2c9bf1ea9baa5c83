//! User domain types.

use chrono::{DateTime, Utc};

use toko_core::{Email, HashedPassword, UserId};

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name; not unique.
    pub username: String,
    /// Login lookup key; unique.
    pub email: Email,
    /// Argon2id hash of the password.
    pub password: HashedPassword,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted.
///
/// Holds the password only in hashed form, so plaintext can never reach
/// storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub password: HashedPassword,
}
