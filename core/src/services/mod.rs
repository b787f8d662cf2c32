//! Business services containing domain logic and use cases.

pub mod auth;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthSessionConfig, AuthSessionService};
pub use session::{CleanupResult, SessionCleanupConfig, SessionCleanupService};
pub use token::{build_signer, KeySetPublisher, TokenSigner, TokenSignerConfig};
