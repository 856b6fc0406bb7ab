use std::fmt::Display;
use std::str::FromStr;

use reel_core::pagination::{PageOverflow, PaginationPolicy, DEFAULT_LIMIT, MAX_LIMIT};

use crate::auth::jwt::JwtConfig;

/// Runtime settings, read once at startup.
///
/// Only `JWT_SECRET` (and `DATABASE_URL`, read by the binary) lack a
/// development default.
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
    /// Upper bound on pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Page sizes and overflow handling for every list endpoint.
    pub pagination: PaginationPolicy,
    /// Admin account to create at startup, if configured.
    pub admin: Option<AdminBootstrap>,
}

/// Credentials for the admin account created at startup.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `DB_MAX_CONNECTIONS`       | `20`                    |
    /// | `PAGINATION_DEFAULT_LIMIT` | `12`                    |
    /// | `PAGINATION_MAX_LIMIT`     | `100`                   |
    /// | `PAGINATION_OVERFLOW`      | `not_found`             |
    /// | `ADMIN_USERNAME`           | unset                   |
    /// | `ADMIN_PASSWORD`           | unset                   |
    /// | `ADMIN_EMAIL`              | `<username>@localhost`  |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let pagination = PaginationPolicy::new(
            env_or("PAGINATION_DEFAULT_LIMIT", DEFAULT_LIMIT),
            env_or("PAGINATION_MAX_LIMIT", MAX_LIMIT),
            env_or("PAGINATION_OVERFLOW", PageOverflow::NotFound),
        );

        let admin = match (
            std::env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
        ) {
            (Some(username), Some(password)) => {
                let email = std::env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{username}@localhost"));
                Some(AdminBootstrap {
                    username,
                    password,
                    email,
                })
            }
            _ => None,
        };

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            jwt: JwtConfig::from_env(),
            pagination,
            admin,
        }
    }
}

/// Parse `key` from the environment, or fall back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
