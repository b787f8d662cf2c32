//! # Infrastructure Layer
//!
//! Concrete implementations of the storage seams defined in `auth_core`:
//!
//! - **Cache**: Redis client and the Redis-backed `RefreshSessionStore`
//! - **Members**: in-memory member repository with bcrypt password hashing,
//!   also serving as the login `CredentialVerifier`

use auth_core::errors::DomainError;

/// Cache module - Redis client and session store
pub mod cache;

/// Member storage and credential verification
pub mod members;

pub use cache::{RedisClient, RedisSessionStore};
pub use members::InMemoryMemberRepository;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Password hashing error
    #[error("Hashing error: {0}")]
    Hashing(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
