//! Server configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

/// Longest auth token lifetime accepted: 30 days.
const MAX_AUTH_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Everything the server needs to start, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Maximum size of the database pool.
    pub database_max_connections: u32,
    /// Deadline applied to every store call.
    pub store_call_timeout: Duration,
    /// How long a command waits for an identity lock.
    pub lock_wait_timeout: Duration,
    /// Key mixed into auth token digests.
    pub session_secret: String,
    /// Lifetime of issued auth tokens.
    pub auth_token_ttl: chrono::Duration,
    /// OTLP collector endpoint; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let session_secret = required(&lookup, "SESSION_SECRET")?;
        if session_secret.is_empty() {
            return Err(AppError::Config("SESSION_SECRET must not be empty".into()));
        }

        let store_call_timeout = positive_millis(&lookup, "STORE_CALL_TIMEOUT_MS", 2000)?;
        let lock_wait_timeout = positive_millis(&lookup, "LOCK_WAIT_TIMEOUT_MS", 5000)?;

        let auth_token_ttl_secs: i64 = parse_or(&lookup, "AUTH_TOKEN_TTL_SECS", 3600)?;
        if !(1..=MAX_AUTH_TOKEN_TTL_SECS).contains(&auth_token_ttl_secs) {
            return Err(AppError::Config(format!(
                "AUTH_TOKEN_TTL_SECS must be between 1 and {MAX_AUTH_TOKEN_TTL_SECS}"
            )));
        }
        let auth_token_ttl = chrono::Duration::try_seconds(auth_token_ttl_secs)
            .ok_or_else(|| AppError::Config("AUTH_TOKEN_TTL_SECS is out of range".into()))?;

        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            store_call_timeout,
            lock_wait_timeout,
            session_secret,
            auth_token_ttl,
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.is_empty()),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if host and port do not form an address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    lookup(key).ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}

/// A millisecond duration that must be non-zero: a zero deadline fails
/// every call it guards.
fn positive_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, AppError> {
    match parse_or(lookup, key, default)? {
        0 => Err(AppError::Config(format!("{key} must be greater than zero"))),
        ms => Ok(Duration::from_millis(ms)),
    }
}
