//! Cache module for Redis-backed session storage
//!
//! This module provides the Redis client with connection retry logic and the
//! `RefreshSessionStore` implementation built on it.

pub mod redis_client;
pub mod session_store;


pub use redis_client::{RedisClient, RetryPolicy};
pub use session_store::RedisSessionStore;

// Re-export commonly used types
pub use auth_shared::config::CacheConfig;
