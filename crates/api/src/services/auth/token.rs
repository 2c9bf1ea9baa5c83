//! Session token issuance.
//!
//! The auth service only needs *some* opaque string bound to the user it just
//! verified; what the string means is up to the session layer consuming it.
//! [`TokenIssuer`] is that seam. [`RandomTokenIssuer`] is the default: 256
//! bits from the OS RNG, base64url encoded, no claims and no expiry.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::TryRngCore;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use toko_core::UserId;

use crate::models::user::User;

const TOKEN_BYTES: usize = 32;

/// Errors that can occur while issuing a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The randomness source failed.
    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

/// An opaque token bound to the user it was issued for.
pub struct SessionToken {
    user_id: UserId,
    value: SecretString,
}

impl SessionToken {
    #[must_use]
    pub fn new(user_id: UserId, value: impl Into<String>) -> Self {
        Self {
            user_id,
            value: SecretString::from(value.into()),
        }
    }

    /// The user this token was issued for.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The token string, for handing to the client.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("user_id", &self.user_id)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Produces a session token for a user whose credentials were verified.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token for `user`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if a token cannot be produced.
    fn issue(&self, user: &User) -> Result<SessionToken, TokenError>;
}

/// Issues random opaque tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenIssuer;

impl TokenIssuer for RandomTokenIssuer {
    fn issue(&self, user: &User) -> Result<SessionToken, TokenError> {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::Entropy(e.to_string()))?;

        Ok(SessionToken::new(user.id, URL_SAFE_NO_PAD.encode(bytes)))
    }
}
