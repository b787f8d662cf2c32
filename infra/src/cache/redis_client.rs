//! Redis client with connection retry logic
//!
//! Wraps a single multiplexed connection. Operations are retried with
//! exponential backoff when the failure looks transient, unless the caller
//! asks for [`RetryPolicy::no_retry`] because replaying the command is unsafe.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, Client, IntoConnectionInfo, RedisError, RedisResult};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use auth_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Boxed future returned by operations passed to [`RedisClient::execute_with_retry`]
pub type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Upper bound on the backoff between two attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// How often an operation is attempted and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Base delay between retries (exponential backoff)
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
        }
    }

    /// Single attempt, for commands that must not be replayed
    ///
    /// A lost reply to a non-idempotent script says nothing about whether it
    /// ran, so running it again can observe its own effect.
    pub fn no_retry() -> Self {
        Self::new(1, 0)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 100)
    }
}

/// Redis client with a shared multiplexed connection
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
    retry: RetryPolicy,
}

impl RedisClient {
    /// Connect with the default retry policy (3 attempts, 100ms base delay)
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        Self::new_with_retry_config(config, 3, 100).await
    }

    /// Connect with a custom retry policy
    pub async fn new_with_retry_config(
        config: CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            database = config.database,
            "creating Redis client"
        );

        let mut info = config.url.as_str().into_connection_info().map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;
        if info.redis.password.is_none() {
            info.redis.password = config.password.clone();
        }
        if info.redis.db == 0 {
            info.redis.db = i64::from(config.database);
        }

        let client = Client::open(info).map_err(|e| {
            error!("Failed to open Redis client: {}", e);
            InfrastructureError::Config(format!("Invalid Redis connection info: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, max_retries, retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            config,
            retry: RetryPolicy::new(max_retries, retry_delay_ms),
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = delay.saturating_mul(2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Policy applied by [`RedisClient::execute_with_retry`]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Prefixed key for `key`
    pub fn make_key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// Run a Redis operation, retrying transient failures with backoff
    ///
    /// The closure gets a fresh handle to the shared connection on every
    /// attempt, so it must own whatever it sends. Only use this for
    /// operations that are safe to replay.
    pub async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        self.execute_with_policy(self.retry, operation).await
    }

    /// Run a Redis operation under an explicit retry policy
    pub async fn execute_with_policy<F, T>(&self, policy: RetryPolicy, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        run_with_retry(policy, || operation(self.connection.clone())).await
    }

    /// PING the server
    ///
    /// # Returns
    /// * `Ok(true)` - Server answered PONG
    /// * `Ok(false)` - Server answered something else
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let result = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => {
                debug!("Redis health check passed");
                Ok(true)
            }
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }
}

/// Drive `operation` until it succeeds, fails permanently or runs out of attempts
pub(crate) async fn run_with_retry<F, Fut, T>(policy: RetryPolicy, mut operation: F) -> RedisResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RedisResult<T>>,
{
    let mut attempts = 0;
    let mut delay = policy.base_delay_ms;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempts < policy.max_attempts && is_retriable_error(&e) => {
                warn!(
                    "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempts, policy.max_attempts, e, delay
                );
                sleep(Duration::from_millis(delay)).await;
                delay = delay.saturating_mul(2).min(MAX_RETRY_DELAY_MS);
            }
            Err(e) => {
                error!("Redis operation failed after {} attempts: {}", attempts, e);
                return Err(e);
            }
        }
    }
}

/// Whether a Redis error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials embedded in a Redis URL
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
