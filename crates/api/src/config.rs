use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// HS256 secret used to verify bearer tokens.
    pub jwt_secret: String,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    /// Requests allowed per client IP per minute.
    pub rate_limit_per_minute: u32,
    /// How long owner-scoped GET responses stay cached.
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    /// Largest accepted request body.
    pub body_limit_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_or("PORT", 3030)?,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 20)?,
            db_min_connections: parse_or("DB_MIN_CONNECTIONS", 5)?,
            jwt_secret: var_or("JWT_SECRET", "dev-secret-change-me-in-production"),
            event_bus_capacity: parse_or("EVENT_BUS_CAPACITY", 1024)?,
            log_level: var_or("LOG_LEVEL", "info"),
            openai_api_key: var_or("OPENAI_API_KEY", ""),
            openai_model: var_or("OPENAI_MODEL", "gpt-4"),
            openai_base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            rate_limit_per_minute: parse_or("RATE_LIMIT_PER_MINUTE", 100)?,
            cache_ttl: Duration::from_secs(parse_or("CACHE_TTL_SECS", 300)?),
            cache_max_entries: parse_or("CACHE_MAX_ENTRIES", 10_000)?,
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", 1024 * 1024)?,
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: String::new(),
            db_max_connections: 1,
            db_min_connections: 0,
            jwt_secret: "test-secret".into(),
            event_bus_capacity: 16,
            log_level: "debug".into(),
            openai_api_key: String::new(),
            openai_model: "gpt-4".into(),
            openai_base_url: "http://127.0.0.1:9".into(),
            rate_limit_per_minute: 100,
            cache_ttl: Duration::from_secs(300),
            cache_max_entries: 100,
            body_limit_bytes: 64 * 1024,
        }
    }
}
