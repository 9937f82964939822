// Process configuration
// Loaded once at startup from the environment (and .env when present)

use std::fmt;
use thiserror::Error;

/// Default token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 360_000;

/// Longest accepted token lifetime (ten years)
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Cost bounds accepted by `bcrypt` (mirrors the crate's private `MIN_COST`/`MAX_COST`).
pub(crate) const BCRYPT_MIN_COST: u32 = 4;
pub(crate) const BCRYPT_MAX_COST: u32 = 31;

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    /// Postgres connection string; `None` selects the in-memory user store
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_secs = match lookup("JWT_EXPIRES_IN") {
            Some(raw) => parse_number::<i64>("JWT_EXPIRES_IN", &raw)?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&token_ttl_secs) {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRES_IN",
                reason: format!("must be between 1 and {} seconds", MAX_TOKEN_TTL_SECS),
            });
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => parse_number::<u32>("BCRYPT_COST", &raw)?,
            None => DEFAULT_BCRYPT_COST,
        };
        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: format!("must be between {} and {}", BCRYPT_MIN_COST, BCRYPT_MAX_COST),
            });
        }

        let port = match lookup("PORT") {
            Some(raw) => parse_number::<u16>("PORT", &raw)?,
            None => 8080,
        };

        Ok(Self {
            jwt_secret,
            token_ttl_secs,
            bcrypt_cost,
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
