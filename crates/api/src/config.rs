use std::time::Duration;

use vitalis_core::resolution::RetryPolicy;

/// A configuration value that could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Attempts per content lookup during page resolution (default: `3`).
    pub page_lookup_attempts: u32,
    /// Backoff before the first lookup retry, in milliseconds (default: `100`).
    pub page_lookup_backoff_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `PAGE_LOOKUP_ATTEMPTS`   | `3`                        |
    /// | `PAGE_LOOKUP_BACKOFF_MS` | `100`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port: parse(&lookup, "PORT", 3000, "a valid u16")?,
            cors_origins,
            request_timeout_secs: parse(&lookup, "REQUEST_TIMEOUT_SECS", 30, "a valid u64")?,
            shutdown_timeout_secs: parse(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30, "a valid u64")?,
            page_lookup_attempts: parse(&lookup, "PAGE_LOOKUP_ATTEMPTS", 3, "a valid u32")?,
            page_lookup_backoff_ms: parse(
                &lookup,
                "PAGE_LOOKUP_BACKOFF_MS",
                100,
                "a valid u64",
            )?,
        })
    }

    /// Retry policy for content lookups during page resolution.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.page_lookup_attempts,
            Duration::from_millis(self.page_lookup_backoff_ms),
        )
    }
}

fn parse<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value,
        }),
    }
}

/// Database settings, kept apart from [`ServerConfig`] because they are only
/// needed at startup.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size (default: `20`).
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// `DATABASE_URL` is required; `DB_MAX_CONNECTIONS` is optional.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) else {
            return Ok(None);
        };
        Ok(Some(Self {
            url,
            max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 20, "a valid u32")?,
        }))
    }
}
