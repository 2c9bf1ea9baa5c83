//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TOKO_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `TOKO_HOST` - Bind address (default: 127.0.0.1)
//! - `TOKO_PORT` - Listen port (default: 8080)
//! - `TOKO_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `TOKO_RUN_MIGRATIONS` - Apply migrations at startup (default: false)
//! - `TOKO_CORS_ORIGINS` - Comma-separated allowed origins (default: any)
//! - `TOKO_LOG_FORMAT` - `text` or `json` (default: text)
//! - `TOKO_ARGON2_MEMORY_KIB` - Argon2 memory cost (default: 65536)
//! - `TOKO_ARGON2_ITERATIONS` - Argon2 time cost (default: 3)
//! - `TOKO_ARGON2_PARALLELISM` - Argon2 lanes (default: 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use argon2::Params;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// API server configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    /// Apply embedded migrations before serving
    pub run_migrations: bool,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    /// Log output format
    pub log_format: LogFormat,
    /// Password hashing cost
    pub hashing: HashingConfig,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Sentry configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; Sentry stays disabled without one
    pub dsn: Option<String>,
    /// Environment tag attached to events
    pub environment: Option<String>,
    /// Fraction of error events sent
    pub sample_rate: f32,
    /// Fraction of transactions traced
    pub traces_sample_rate: f32,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_max_connections", &self.db_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("cors_origins", &self.cors_origins)
            .field("log_format", &self.log_format)
            .field("hashing", &self.hashing)
            .field("sentry", &self.sentry)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database_url = env
            .optional("TOKO_DATABASE_URL")
            // Fallback to generic DATABASE_URL (set by Fly.io postgres attach)
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("TOKO_DATABASE_URL".to_string()))?;

        let cors_origins = env
            .optional("TOKO_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let hashing = HashingConfig {
            memory_kib: env.parsed_or("TOKO_ARGON2_MEMORY_KIB", HashingConfig::DEFAULT.memory_kib)?,
            iterations: env.parsed_or("TOKO_ARGON2_ITERATIONS", HashingConfig::DEFAULT.iterations)?,
            parallelism: env
                .parsed_or("TOKO_ARGON2_PARALLELISM", HashingConfig::DEFAULT.parallelism)?,
        };
        hashing
            .params()
            .map_err(|e| ConfigError::InvalidEnvVar("TOKO_ARGON2_*".to_string(), e))?;

        Ok(Self {
            database_url,
            host: env.parsed_or("TOKO_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env.parsed_or("TOKO_PORT", 8080)?,
            db_max_connections: env.parsed_or("TOKO_DB_MAX_CONNECTIONS", 10)?,
            run_migrations: env.parsed_or("TOKO_RUN_MIGRATIONS", false)?,
            cors_origins,
            log_format: env.parsed_or("TOKO_LOG_FORMAT", LogFormat::Text)?,
            hashing,
            sentry: SentryConfig {
                dsn: env.optional("SENTRY_DSN"),
                environment: env.optional("SENTRY_ENVIRONMENT"),
                sample_rate: env.parsed_or("SENTRY_SAMPLE_RATE", 1.0)?,
                traces_sample_rate: env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl HashingConfig {
    /// OWASP-leaning defaults for an interactive login path.
    pub const DEFAULT: Self = Self {
        memory_kib: 65536,
        iterations: 3,
        parallelism: 1,
    };

    /// Validated Argon2 parameters.
    ///
    /// # Errors
    ///
    /// Returns a description of the first out-of-range value.
    pub fn params(&self) -> Result<Params, String> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| e.to_string())
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("TOKO_DATABASE_URL", "postgres://localhost/toko")]).unwrap();

        assert_eq!(config.database_url.expose_secret(), "postgres://localhost/toko");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 10);
        assert!(!config.run_migrations);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.hashing, HashingConfig::DEFAULT);
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_missing_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "TOKO_DATABASE_URL"));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://fly/toko")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fly/toko");
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("TOKO_DATABASE_URL", "postgres://localhost/toko"),
            ("TOKO_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TOKO_PORT"));
    }

    #[test]
    fn test_cors_origins_are_split() {
        let config = load(&[
            ("TOKO_DATABASE_URL", "postgres://localhost/toko"),
            ("TOKO_CORS_ORIGINS", "https://a.example, https://b.example,,"),
        ])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_log_format_json() {
        let config = load(&[
            ("TOKO_DATABASE_URL", "postgres://localhost/toko"),
            ("TOKO_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_unusable_argon2_cost() {
        let err = load(&[
            ("TOKO_DATABASE_URL", "postgres://localhost/toko"),
            ("TOKO_ARGON2_ITERATIONS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_socket_addr() {
        let config = load(&[
            ("TOKO_DATABASE_URL", "postgres://localhost/toko"),
            ("TOKO_HOST", "0.0.0.0"),
            ("TOKO_PORT", "3000"),
        ])
        .unwrap();

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("TOKO_DATABASE_URL", "postgres://toko:hunter2@db/toko")]).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }
}
