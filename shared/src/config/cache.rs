//! Redis configuration for the shared session store

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConfigError, EnvReader};

/// Redis connection configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL (`redis://host:port`)
    pub url: String,

    /// Password, applied when the URL carries none
    #[serde(skip_serializing, default)]
    pub password: Option<String>,

    /// Redis database number (0-15)
    #[serde(default)]
    pub database: u8,

    /// Prefix for every session key
    pub key_prefix: String,
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("url", &self.url)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            password: None,
            database: 0,
            key_prefix: String::from("auth:refresh"),
        }
    }
}

impl CacheConfig {
    pub(crate) fn from_reader(env: &EnvReader<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let url = match env.string("AUTH_REDIS_URL") {
            Some(url) => url,
            None => match env.string("AUTH_REDIS_HOST") {
                Some(host) => format!("redis://{}", host),
                None => defaults.url,
            },
        };
        let database: u8 = env.parse_or("AUTH_REDIS_DB", defaults.database)?;
        if database > 15 {
            return Err(ConfigError::invalid("AUTH_REDIS_DB", "must be between 0 and 15"));
        }

        Ok(Self {
            url,
            password: env.string("AUTH_REDIS_PASSWORD"),
            database,
            key_prefix: env.string_or("AUTH_REDIS_KEY_PREFIX", &defaults.key_prefix),
        })
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}
