//! Startup wiring: build the signer, stores and services from configuration
//!
//! Construction order is fixed: clock, signer, session store, member
//! repository, then the session service that borrows all of them. A signer
//! with bad key material aborts startup.

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use auth_core::clock::{Clock, SystemClock};
use auth_core::repositories::{InMemorySessionStore, RefreshSessionStore};
use auth_core::services::{
    build_signer, AuthSessionConfig, AuthSessionService, KeySetPublisher, SessionCleanupConfig,
    SessionCleanupService, TokenSignerConfig,
};
use auth_infra::{InMemoryMemberRepository, RedisClient, RedisSessionStore};
use auth_shared::config::{AppConfig, SessionStoreBackend};

use crate::state::AppState;

/// Everything `main` needs to serve traffic
pub struct Application {
    pub state: AppState,
    /// Background sweep of the in-memory store, if one runs
    pub cleanup_task: Option<JoinHandle<()>>,
}

/// Build the application state from validated configuration
pub async fn build_application(config: &AppConfig) -> anyhow::Result<Application> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let signer_config =
        TokenSignerConfig::from_jwt_config(&config.jwt).context("invalid signing configuration")?;
    let signer = build_signer(signer_config, clock.clone()).context("token signer not ready")?;

    let retention =
        Duration::try_seconds(config.session.retention_seconds).unwrap_or(Duration::MAX);
    let (sessions, cleanup_task) = match config.session.backend {
        SessionStoreBackend::Memory => {
            let store = Arc::new(InMemorySessionStore::new(clock.clone()));
            let cleanup = Arc::new(SessionCleanupService::new(
                store.clone(),
                SessionCleanupConfig::from_settings(&config.session),
            ));
            let store: Arc<dyn RefreshSessionStore> = store;
            (store, cleanup.start_background_task())
        }
        SessionStoreBackend::Redis => {
            let client = RedisClient::new(config.cache.clone())
                .await
                .context("failed to connect to Redis")?;
            let store: Arc<dyn RefreshSessionStore> =
                Arc::new(RedisSessionStore::with_clock(client, retention, clock.clone()));
            (store, None)
        }
    };
    info!(backend = ?config.session.backend, "session store ready");

    let members = Arc::new(InMemoryMemberRepository::new());
    let auth_service = AuthSessionService::new(
        members.clone(),
        sessions,
        signer.clone(),
        clock,
        AuthSessionConfig::from_settings(&config.refresh, &config.session),
    );

    Ok(Application {
        state: AppState {
            auth_service: Arc::new(auth_service),
            members,
            key_set: Arc::new(KeySetPublisher::new(signer)),
            cookie_secure: config.refresh.cookie_secure,
            jwks_path: config.jwt.jwks_path.clone(),
        },
        cleanup_task,
    })
}
