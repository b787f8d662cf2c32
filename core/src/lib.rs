//! # Auth Core
//!
//! Domain layer of the auth service: access token signing and verification,
//! refresh-session lifecycle, key-set publication and the login/refresh/logout
//! orchestration that ties them together. Storage backends and transport live
//! in the `infra` and `api` crates and plug in through the traits defined here.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

#[cfg(any(test, feature = "test-util"))]
pub mod testutil;

// Re-export commonly used types for convenience
pub use clock::{Clock, SystemClock};
pub use domain::{
    AccessToken, ClientMetadata, KeySet, LoginResponse, Member, NewMember, RefreshSession,
    SessionStatus, VerificationKey,
};
pub use errors::{
    AuthError, CredentialError, DomainError, DomainResult, SessionError, TokenError,
};
pub use repositories::{
    CredentialVerifier, InMemorySessionStore, MemberRepository, RefreshSessionStore,
};
pub use services::{
    build_signer, AuthSessionConfig, AuthSessionService, CleanupResult, KeySetPublisher,
    SessionCleanupConfig, SessionCleanupService, TokenSigner, TokenSignerConfig,
};
