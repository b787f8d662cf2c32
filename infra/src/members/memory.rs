//! In-process member repository
//!
//! Members are keyed by normalized email. Password hashing and verification
//! run on the blocking pool since bcrypt is deliberately slow.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task;
use tracing::{debug, info, warn};

use auth_core::clock::{Clock, SystemClock};
use auth_core::domain::entities::member::{Member, NewMember, MAX_PASSWORD_BYTES};
use auth_core::errors::{AuthError, CredentialError, DomainError};
use auth_core::repositories::{CredentialVerifier, MemberRepository};

use crate::InfrastructureError;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Member repository backed by a `HashMap` behind a `tokio::sync::RwLock`
pub struct InMemoryMemberRepository {
    members: Arc<RwLock<HashMap<String, Member>>>,
    clock: Arc<dyn Clock>,
    cost: u32,
    /// Verified against when the email is unknown, so both paths cost the same
    dummy_hash: Option<String>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST, Arc::new(SystemClock))
    }

    /// Create a repository hashing with the given bcrypt cost
    pub fn with_cost(cost: u32, clock: Arc<dyn Clock>) -> Self {
        let dummy_hash = match bcrypt::hash("not-a-real-password", cost) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!("failed to prepare dummy password hash: {}", e);
                None
            }
        };

        Self {
            members: Arc::new(RwLock::new(HashMap::new())),
            clock,
            cost,
            dummy_hash,
        }
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }

    async fn hash_password(&self, password: String) -> Result<String, InfrastructureError> {
        let cost = self.cost;
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| InfrastructureError::Hashing(e.to_string()))?
            .map_err(|e| InfrastructureError::Hashing(e.to_string()))
    }

    async fn verify_password(
        &self,
        password: String,
        hash: String,
    ) -> Result<bool, InfrastructureError> {
        task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| InfrastructureError::Hashing(e.to_string()))?
            .map_err(|e| InfrastructureError::Hashing(e.to_string()))
    }

    /// Spend the same work as a real check when the outcome is already known
    async fn verify_dummy(&self, secret: &str) {
        if let Some(dummy) = self.dummy_hash.clone() {
            let _ = self.verify_password(secret.to_string(), dummy).await;
        }
    }
}

impl Default for InMemoryMemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn register(&self, member: NewMember) -> Result<Member, DomainError> {
        let email = Member::normalize_email(&member.email);
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("email is not valid"));
        }
        if member.name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        if member.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if member.password.len() > MAX_PASSWORD_BYTES {
            return Err(DomainError::validation(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        // Skip the hash for an obvious duplicate; the insert below re-checks
        if self.members.read().await.contains_key(&email) {
            return Err(AuthError::MemberAlreadyExists.into());
        }

        let password_hash = self.hash_password(member.password).await?;
        let stored = Member::new(&email, &member.name, password_hash, self.clock.now());

        let mut members = self.members.write().await;
        match members.entry(email) {
            Entry::Occupied(_) => Err(AuthError::MemberAlreadyExists.into()),
            Entry::Vacant(slot) => {
                info!(member_id = %stored.id, "member registered");
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, DomainError> {
        let members = self.members.read().await;
        Ok(members.get(&Member::normalize_email(email)).cloned())
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryMemberRepository {
    async fn verify_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<String, CredentialError> {
        let member = self
            .members
            .read()
            .await
            .get(&Member::normalize_email(identifier))
            .cloned();

        let Some(member) = member else {
            self.verify_dummy(secret).await;
            debug!("credential check for unknown member");
            return Err(CredentialError::NotFound);
        };

        // Would only be compared by its first bytes, and no stored password is longer
        if secret.len() > MAX_PASSWORD_BYTES {
            self.verify_dummy(secret).await;
            debug!(member_id = %member.id, "over-long password refused");
            return Err(CredentialError::Mismatch);
        }

        match self
            .verify_password(secret.to_string(), member.password_hash)
            .await
        {
            Ok(true) => Ok(member.id.to_string()),
            Ok(false) => {
                debug!(member_id = %member.id, "password mismatch");
                Err(CredentialError::Mismatch)
            }
            Err(e) => Err(CredentialError::Unavailable {
                message: e.to_string(),
            }),
        }
    }
}
