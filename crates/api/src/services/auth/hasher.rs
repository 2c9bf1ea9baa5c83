//! One-way password hashing.
//!
//! Hashes are Argon2id in PHC string format with a fresh random salt per
//! call, so hashing the same password twice yields two different strings
//! that both verify. Verification reads the cost parameters from the stored
//! string and compares in constant time.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use toko_core::HashedPassword;

/// Errors that can occur while hashing.
#[derive(Debug, Error)]
pub enum HashError {
    /// The Argon2 implementation failed (parameters, salt generation).
    #[error("argon2: {0}")]
    Argon2(String),

    /// The blocking task running the hash was cancelled or panicked.
    #[error("hashing task aborted")]
    Aborted,
}

/// Turns plaintext secrets into storable hashes and checks them later.
pub trait CredentialHasher: Send + Sync {
    /// Hash `secret` with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `HashError` only on internal failure; callers must not retry.
    fn hash(&self, secret: &SecretString) -> Result<HashedPassword, HashError>;

    /// Whether `secret` is the input that produced `hashed`.
    ///
    /// A malformed `hashed` value is a mismatch, not an error.
    fn verify(&self, secret: &SecretString, hashed: &HashedPassword) -> bool;
}

/// Argon2id [`CredentialHasher`] with a fixed cost.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher that produces hashes with the given cost.
    #[must_use]
    pub const fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, secret: &SecretString) -> Result<HashedPassword, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(secret.expose_secret().as_bytes(), &salt)
            .map(|hash| HashedPassword::from_encoded(hash.to_string()))
            .map_err(|e| HashError::Argon2(e.to_string()))
    }

    fn verify(&self, secret: &SecretString, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed.as_str()) else {
            return false;
        };

        self.argon2()
            .verify_password(secret.expose_secret().as_bytes(), &parsed)
            .is_ok()
    }
}
