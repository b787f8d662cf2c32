//! Refresh session store trait defining the interface for session persistence.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::entities::session::RefreshSession;
use crate::errors::DomainError;

/// Repository of refresh sessions keyed by their identifier
///
/// Every mutation is a single exclusive step: a reader never observes a
/// half-written record, and operations on the same identifier are totally
/// ordered. Terminal sessions are never made active again.
///
/// # Errors
/// Store-level outcomes are reported as `DomainError::Session(..)`; backend
/// failures surface as `DomainError::Internal`.
#[async_trait]
pub trait RefreshSessionStore: Send + Sync {
    /// Insert `session` under `id` if no session is stored there yet
    ///
    /// The existence check and the insert are one atomic step, so of any
    /// number of concurrent calls with the same `id` exactly one succeeds.
    ///
    /// # Returns
    /// * `Ok(())` - Session stored
    /// * `Err(SessionError::AlreadyExists)` - `id` is taken; the stored record is untouched
    /// * `Err(DomainError::Validation)` - `session.id` differs from `id`
    async fn create_session(&self, id: &str, session: RefreshSession) -> Result<(), DomainError>;

    /// Read the latest committed state of a session
    ///
    /// # Returns
    /// * `Ok(RefreshSession)` - Session found (active or terminal)
    /// * `Err(SessionError::NotFound)` - No session under `id`
    async fn get_session(&self, id: &str) -> Result<RefreshSession, DomainError>;

    /// Set the revocation timestamp
    ///
    /// Idempotent: revoking an already revoked session succeeds and keeps the
    /// first timestamp.
    ///
    /// # Returns
    /// * `Ok(())` - Session is revoked
    /// * `Err(SessionError::NotFound)` - No session under `id`
    async fn revoke(&self, id: &str) -> Result<(), DomainError>;

    /// Revoke an active session and return it, in one atomic step
    ///
    /// Used for rotation: of two concurrent calls with the same `id` only one
    /// gets the session back.
    ///
    /// # Returns
    /// * `Ok(RefreshSession)` - The session as it is now stored (revoked)
    /// * `Err(SessionError::NotFound)` - No session under `id`
    /// * `Err(SessionError::Invalid)` - Session is already revoked or expired
    async fn consume(&self, id: &str) -> Result<RefreshSession, DomainError>;

    /// Delete sessions whose expiry lies more than `retention` in the past
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of sessions removed
    async fn purge_expired(&self, retention: Duration) -> Result<usize, DomainError>;
}
