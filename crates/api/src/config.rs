use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// A missing or unparsable environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set in the environment")]
    Missing { name: &'static str },

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// Everything except `JWT_SECRET` has a default suitable for local
/// development.
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
    /// Postgres connection string. When unset the server runs on the
    /// in-memory store.
    pub database_url: Option<String>,
    /// JWT verification settings for admin-scoped resources.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = var_or("HOST", "0.0.0.0");
        let port = parse_var("PORT", "3000")?;

        let cors_origins = parse_origins(&var_or("CORS_ORIGINS", "http://localhost:5173"));

        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", "30")?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let jwt = JwtConfig::from_env()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            jwt,
        })
    }
}

pub(crate) fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

/// Read `name` (or `default`) and parse it, reporting failures as
/// [`ConfigError::Invalid`].
pub(crate) fn parse_var<T>(name: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = var_or(name, default);
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
        value,
    })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
