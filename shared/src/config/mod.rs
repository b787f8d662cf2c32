//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing, refresh cookie and session lifecycle settings
//! - `cache` - Redis connection used by the shared session store
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP listener and CORS configuration
//!
//! Every value is read from the process environment. `AppConfig::from_env`
//! parses and validates in one step so the binary can refuse to start on a
//! misconfiguration.

pub mod auth;
pub mod cache;
pub mod environment;
pub mod server;

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::{JwtConfig, RefreshConfig, SessionConfig, SessionStoreBackend};
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Errors raised while loading or validating configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} is empty")]
    Missing { var: String },

    #[error("{var}: {message}")]
    Invalid { var: String, message: String },

    #[error("failed to read {path}: {message}")]
    Unreadable { path: String, message: String },
}

impl ConfigError {
    pub(crate) fn missing(var: &str) -> Self {
        Self::Missing { var: var.to_string() }
    }

    pub(crate) fn invalid(var: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            var: var.to_string(),
            message: message.into(),
        }
    }
}

/// Reads typed values through a lookup function.
///
/// Production code looks up the process environment; tests pass a map so
/// they never touch global state.
pub struct EnvReader<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl<'a> EnvReader<'a> {
    pub fn new(lookup: &'a dyn Fn(&str) -> Option<String>) -> Self {
        Self { lookup }
    }

    /// Trimmed value, `None` when unset or blank
    pub fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn string_or(&self, name: &str, default: &str) -> String {
        self.string(name).unwrap_or_else(|| default.to_string())
    }

    /// Parses the value if present; an unparsable value is an error, not a default
    pub fn parse_or<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.string(name) {
            Some(raw) => raw
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(name, e.to_string())),
            None => Ok(default),
        }
    }

    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, ConfigError> {
        match self.string(name) {
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::invalid(name, format!("invalid boolean '{}'", raw))),
            },
            None => Ok(default),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// CORS configuration for the public listener
    pub cors: CorsConfig,

    /// Access token signing configuration
    pub jwt: JwtConfig,

    /// Refresh cookie configuration
    pub refresh: RefreshConfig,

    /// Session store and lifecycle configuration
    pub session: SessionConfig,

    /// Redis configuration (used when the session store is `redis`)
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and validate configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    /// Load and validate configuration through an arbitrary lookup
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = EnvReader::new(lookup);
        let environment = Environment::from_reader(&env);

        let config = Self {
            environment,
            server: ServerConfig::from_reader(&env)?,
            cors: CorsConfig::from_reader(&env)?,
            jwt: JwtConfig::from_reader(&env)?,
            refresh: RefreshConfig::from_reader(&env)?,
            session: SessionConfig::from_reader(&env)?,
            cache: CacheConfig::from_reader(&env)?,
            logging: LoggingConfig::from_reader(&env, environment)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field rules that parsing alone cannot enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.jwt.validate(self.environment)?;
        self.refresh.validate()?;
        self.session.validate()?;
        Ok(())
    }
}
