//! Refresh session entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Client details recorded with a session for audit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetadata {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl ClientMetadata {
    pub fn new(user_agent: Option<String>, ip_address: Option<String>) -> Self {
        Self {
            user_agent,
            ip_address,
        }
    }
}

/// Lifecycle state of a session at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Revoked,
    Expired,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Active)
    }
}

/// Server-tracked refresh session
///
/// A session is active until it is revoked or reaches `expires_at`. Once
/// terminal it stays terminal: the only mutation is setting `revoked_at`,
/// and that is never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    /// Unguessable identifier, also the storage key
    pub id: String,

    /// Owning subject (member ID)
    pub subject: String,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Unset while the session has not been revoked
    pub revoked_at: Option<DateTime<Utc>>,

    pub client: ClientMetadata,
}

impl RefreshSession {
    /// Create an active session living for `ttl` from `created_at`
    ///
    /// An expiry beyond the representable range is clamped to the latest
    /// instant `DateTime<Utc>` can hold.
    pub fn new(
        id: String,
        subject: String,
        created_at: DateTime<Utc>,
        ttl: Duration,
        client: ClientMetadata,
    ) -> Self {
        Self {
            id,
            subject,
            created_at,
            expires_at: created_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            revoked_at: None,
            client,
        }
    }

    /// Status at `now`; revocation wins over expiry
    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        if self.revoked_at.is_some() {
            SessionStatus::Revoked
        } else if now >= self.expires_at {
            SessionStatus::Expired
        } else {
            SessionStatus::Active
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status_at(now) == SessionStatus::Active
    }

    /// Set the revocation timestamp unless one is already recorded
    pub fn revoke_at(&mut self, now: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(now);
        }
    }

    /// Whether the retention window after expiry has passed
    pub fn is_purgeable_at(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        self.expires_at
            .checked_add_signed(retention)
            .is_some_and(|purge_at| now >= purge_at)
    }

    pub fn masked_id(&self) -> String {
        mask_session_id(&self.id)
    }
}

/// Short prefix of a session identifier, safe to log
pub fn mask_session_id(id: &str) -> String {
    let prefix: String = id.chars().take(6).collect();
    format!("{}...", prefix)
}
