//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{ConfigError, EnvReader};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Public listener port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub(crate) fn from_reader(env: &EnvReader<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env.string_or("AUTH_SERVER_HOST", &defaults.host),
            port: env.parse_or("AUTH_PUBLIC_PORT", defaults.port)?,
        })
    }

    /// Socket address string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::invalid(
                "AUTH_PUBLIC_PORT",
                "must be between 1 and 65535",
            ));
        }
        Ok(())
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` allows any origin, empty allows none
    pub allowed_origins: Vec<String>,

    /// Whether credentials (cookies) may be sent cross-origin
    pub allow_credentials: bool,

    /// Max age for preflight cache in seconds
    pub max_age: usize,
}

impl CorsConfig {
    pub(crate) fn from_reader(env: &EnvReader<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            allowed_origins: parse_origins(
                &env.string_or("AUTH_CORS_PUBLIC_ALLOWED_ORIGINS", ""),
            ),
            allow_credentials: env.bool_or("AUTH_CORS_PUBLIC_ALLOW_CREDENTIALS", false)?,
            max_age: env.parse_or("CORS_MAX_AGE", 3600)?,
        })
    }

    /// Whether every origin is allowed
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// Parse a comma-separated origin list.
///
/// `""` yields no origins, `"*"` yields `["*"]`, anything else is split on
/// commas with entries trimmed and blanks dropped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    if raw == "*" {
        return vec![String::from("*")];
    }
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
