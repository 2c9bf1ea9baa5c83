//! Authentication service.
//!
//! Registers users with hashed passwords and exchanges verified credentials
//! for an opaque session token. Hashing and verification run on the blocking
//! pool so a slow hash never stalls the async runtime.

mod error;
pub mod hasher;
pub mod token;

pub use error::AuthError;
pub use hasher::{Argon2Hasher, CredentialHasher, HashError};
pub use token::{RandomTokenIssuer, SessionToken, TokenError, TokenIssuer};

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tokio::sync::OnceCell;

use toko_core::{Email, HashedPassword, UserId};

use crate::db::{RepositoryError, UserStore};
use crate::models::user::{NewUser, User};

/// Input hashed against when a login names an unknown email, so that path
/// costs the same as a wrong password.
const DECOY_PASSWORD: &str = "toko-decoy-password";

/// A registration request.
#[derive(Debug, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
}

/// A login request.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
}

/// Move a plaintext field straight into a `SecretString`.
fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// A successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub token: SessionToken,
}

/// How far a registration got before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    Received,
    Validated,
    Hashed,
    Persisted,
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Hashed => "hashed",
            Self::Persisted => "persisted",
        })
    }
}

/// Authentication service.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    decoy: OnceCell<HashedPassword>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            decoy: OnceCell::new(),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` if the username or password is empty.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::PasswordHash` or `AuthError::Repository` on
    /// infrastructure failure; nothing is persisted in either case.
    pub async fn register(&self, input: Registration) -> Result<UserId, AuthError> {
        let Registration {
            username,
            email,
            password,
        } = input;

        let stage = RegistrationStage::Received;
        let (username, email) =
            validate_registration(&username, &email, &password).map_err(|e| failed(stage, e))?;

        let stage = RegistrationStage::Validated;
        let password = self.hash(password).await.map_err(|e| failed(stage, e))?;

        let stage = RegistrationStage::Hashed;
        let id = self
            .users
            .create(&NewUser {
                username,
                email,
                password,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
            .map_err(|e| failed(stage, e))?;

        tracing::info!(user_id = %id, stage = %RegistrationStage::Persisted, "User registered");
        Ok(id)
    }

    /// Verify credentials and issue a session token.
    ///
    /// Unknown email and wrong password both yield
    /// `AuthError::InvalidCredentials`, after the same amount of hashing work.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::InvalidInput` for a
    /// malformed request, `AuthError::InvalidCredentials` if the credentials
    /// don't match, and an infrastructure variant otherwise.
    pub async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, AuthError> {
        let Credentials { email, password } = credentials;

        let email = Email::parse(&email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthError::InvalidInput("password is required".into()));
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            let decoy = self.decoy_hash().await?;
            self.verify(password, decoy).await?;
            tracing::info!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify(password, user.password.clone()).await? {
            tracing::info!(user_id = %user.id, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome { user, token })
    }

    /// Compute the decoy hash now instead of on the first unknown-email login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn warm_up(&self) -> Result<(), AuthError> {
        self.decoy_hash().await.map(drop)
    }

    /// Check that the backing user store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be reached.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.users.ping().await
    }

    async fn hash(&self, password: SecretString) -> Result<HashedPassword, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|_| HashError::Aborted)??;
        Ok(hashed)
    }

    async fn verify(&self, password: SecretString, hashed: HashedPassword) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|_| HashError::Aborted)?;
        Ok(matched)
    }

    async fn decoy_hash(&self) -> Result<HashedPassword, AuthError> {
        self.decoy
            .get_or_try_init(|| self.hash(SecretString::from(DECOY_PASSWORD)))
            .await
            .cloned()
    }
}

fn validate_registration(
    username: &str,
    email: &str,
    password: &SecretString,
) -> Result<(String, Email), AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::InvalidInput("username is required".into()));
    }

    let email = Email::parse(email)?;

    if password.expose_secret().is_empty() {
        return Err(AuthError::InvalidInput("password is required".into()));
    }

    Ok((username.to_owned(), email))
}

fn failed(stage: RegistrationStage, error: AuthError) -> AuthError {
    if error.is_client_error() {
        tracing::info!(%stage, error = %error, "Registration failed");
    } else {
        tracing::error!(%stage, error = %error, "Registration failed");
    }
    error
}
