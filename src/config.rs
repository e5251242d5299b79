use std::env;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// Largest request timeout Postgres can enforce as a statement timeout.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = i32::MAX as u64 / 1000;

// RFC 3986 unreserved characters pass through, everything else is escaped.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(&'static str),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Connection parameters for the PostgreSQL store.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub pool_max_size: u32,
}

// Keep the password out of logs.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("pool_max_size", &self.pool_max_size)
            .finish()
    }
}

impl DbConfig {
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            utf8_percent_encode(&self.user, USERINFO),
            utf8_percent_encode(&self.password, USERINFO),
            self.host,
            self.port,
            utf8_percent_encode(&self.name, USERINFO)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db: DbConfig,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load from the process environment (after `.env`, when present).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| match lookup(key) {
            None => Err(ConfigError::MissingEnvVar(key)),
            Some(v) if v.is_empty() => Err(ConfigError::EmptyValue(key)),
            Some(v) => Ok(v),
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let db = DbConfig {
            user: required("DB_USER")?,
            password: required("DB_PASS")?,
            name: required("DB_NAME")?,
            host: optional("DB_HOST", "localhost"),
            port: parse("DB_PORT", optional("DB_PORT", "5432"))?,
            pool_max_size: parse("DB_POOL_MAX_SIZE", optional("DB_POOL_MAX_SIZE", "10"))?,
        };

        let timeout_secs: u64 = parse(
            "REQUEST_TIMEOUT_SECS",
            optional("REQUEST_TIMEOUT_SECS", "30"),
        )?;
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
            });
        }

        Ok(Self {
            db,
            host: optional("HOST", "0.0.0.0"),
            port: parse("PORT", optional("PORT", "8080"))?,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
