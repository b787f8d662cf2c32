//! Domain entities representing core business objects.

pub mod key_set;
pub mod member;
pub mod session;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use key_set::{KeySet, VerificationKey};
pub use member::{Member, NewMember};
pub use session::{mask_session_id, ClientMetadata, RefreshSession, SessionStatus};
pub use token::{AccessToken, Claims};
