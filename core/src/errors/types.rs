//! Error taxonomy for authentication, token and session operations
//!
//! Variants that reach clients are deliberately coarse. Callers see a single
//! outcome for every credential failure and for every token or session
//! rejection; the distinguishing cause is only logged.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Member already exists")]
    MemberAlreadyExists,
}

/// Token signing and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid key material: {reason}")]
    InvalidKeyMaterial { reason: String },

    #[error("Token issuance failed: {reason}")]
    TokenIssuanceFailed { reason: String },

    #[error("Invalid token")]
    InvalidToken,
}

/// Refresh session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Refresh session already exists")]
    AlreadyExists,

    #[error("Refresh session not found")]
    NotFound,

    #[error("Refresh session creation failed after {attempts} attempts")]
    CreationFailed { attempts: u32 },

    /// Not found, expired or revoked, collapsed into one outcome
    #[error("Refresh session is invalid")]
    Invalid,
}

/// Errors reported by a credential verifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Identifier not found")]
    NotFound,

    #[error("Secret does not match")]
    Mismatch,

    #[error("Credential store unavailable: {message}")]
    Unavailable { message: String },
}
