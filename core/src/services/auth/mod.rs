//! Authentication session module
//!
//! Orchestrates the login, refresh and logout flows:
//! - Credential verification through `CredentialVerifier`
//! - Access token issuance through `TokenSigner`
//! - Refresh session creation with bounded retry on identifier collisions
//! - Single-use rotation of refresh sessions

mod config;
mod service;
mod session_id;

#[cfg(test)]
mod tests;

pub use config::{AuthSessionConfig, API_VERSION};
pub use service::AuthSessionService;
pub use session_id::{RandomSessionIdGenerator, SessionIdGenerator};
