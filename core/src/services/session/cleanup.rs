//! Session cleanup service for periodic purging of expired refresh sessions

use std::sync::Arc;

use auth_shared::config::SessionConfig;
use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::RefreshSessionStore;

/// Configuration for the session cleanup service
#[derive(Debug, Clone)]
pub struct SessionCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// How long sessions stay readable after expiry
    pub retention: Duration,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            retention: Duration::days(1),
            enabled: true,
        }
    }
}

impl SessionCleanupConfig {
    pub fn from_settings(session: &SessionConfig) -> Self {
        Self {
            interval_seconds: session.cleanup_interval_seconds,
            retention: Duration::try_seconds(session.retention_seconds).unwrap_or(Duration::MAX),
            enabled: true,
        }
    }
}

/// Service for purging refresh sessions past their retention window
pub struct SessionCleanupService {
    store: Arc<dyn RefreshSessionStore>,
    config: SessionCleanupConfig,
}

impl SessionCleanupService {
    /// Create a new session cleanup service
    pub fn new(store: Arc<dyn RefreshSessionStore>, config: SessionCleanupConfig) -> Self {
        Self { store, config }
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of the cycle; store failures are
    ///   recorded in `errors` rather than aborting
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();

        match self.store.purge_expired(self.config.retention).await {
            Ok(count) => {
                result.sessions_purged = count;
                if count > 0 {
                    info!(purged = count, "purged expired refresh sessions");
                }
            }
            Err(e) => {
                error!(error = %e, "failed to purge expired sessions");
                result.errors.push(format!("Session purge error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Session cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                retention_seconds = self.config.retention.num_seconds(),
                "Session cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Session cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of sessions removed from the store
    pub sessions_purged: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
