//! Member repository trait defining the interface for member registration.

use async_trait::async_trait;

use crate::domain::entities::member::{Member, NewMember};
use crate::errors::DomainError;

/// Repository trait for Member entity persistence operations
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Register a new member, hashing the password before it is stored
    ///
    /// # Returns
    /// * `Ok(Member)` - The stored member
    /// * `Err(AuthError::MemberAlreadyExists)` - Email is already registered
    async fn register(&self, member: NewMember) -> Result<Member, DomainError>;

    /// Find a member by email (compared after normalization)
    ///
    /// # Returns
    /// * `Ok(Some(Member))` - Member found
    /// * `Ok(None)` - No member with that email
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, DomainError>;
}
