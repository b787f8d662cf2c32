//! In-process refresh session store

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::domain::entities::session::{mask_session_id, RefreshSession};
use crate::errors::{DomainError, SessionError};

use super::r#trait::RefreshSessionStore;

/// Session store backed by a `HashMap` behind a `tokio::sync::RwLock`
///
/// Reads share the lock. Every mutation holds the write lock across its
/// whole check-and-mutate sequence.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, RefreshSession>>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    /// Create an empty store using the given clock for revocation timestamps
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Number of stored sessions, terminal ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl RefreshSessionStore for InMemorySessionStore {
    async fn create_session(&self, id: &str, session: RefreshSession) -> Result<(), DomainError> {
        if session.id != id {
            return Err(DomainError::validation("session id does not match its key"));
        }

        let mut sessions = self.sessions.write().await;
        match sessions.entry(id.to_string()) {
            Entry::Occupied(_) => Err(SessionError::AlreadyExists.into()),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(())
            }
        }
    }

    async fn get_session(&self, id: &str) -> Result<RefreshSession, DomainError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound.into())
    }

    async fn revoke(&self, id: &str) -> Result<(), DomainError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound)?;
        session.revoke_at(now);
        Ok(())
    }

    async fn consume(&self, id: &str) -> Result<RefreshSession, DomainError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound)?;
        if !session.is_active_at(now) {
            debug!(
                session = %mask_session_id(id),
                status = ?session.status_at(now),
                "refusing to consume terminal session"
            );
            return Err(SessionError::Invalid.into());
        }
        session.revoke_at(now);
        Ok(session.clone())
    }

    async fn purge_expired(&self, retention: Duration) -> Result<usize, DomainError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_purgeable_at(now, retention));
        Ok(before - sessions.len())
    }
}
