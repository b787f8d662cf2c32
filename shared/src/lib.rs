//! Shared configuration and wire types for the auth service
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment and validated at startup
//! - The error response body returned by the HTTP layer

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, CorsConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, RefreshConfig, ServerConfig, SessionConfig, SessionStoreBackend,
};
pub use errors::{error_codes, ErrorResponse};
