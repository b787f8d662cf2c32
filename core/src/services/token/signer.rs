//! Signer capability shared by the RSA and HMAC variants

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use tracing::info;

use crate::clock::Clock;
use crate::domain::entities::key_set::KeySet;
use crate::domain::entities::token::AccessToken;
use crate::errors::{DomainError, TokenError};

use super::config::{algorithm_name, is_hmac_family, is_rsa_family, TokenSignerConfig};
use super::hmac_signer::HmacTokenSigner;
use super::rsa_signer::RsaTokenSigner;

/// Mints and verifies access tokens
///
/// Implementations are immutable after construction and safe to share across
/// tasks. Rotating keys means building a new signer.
pub trait TokenSigner: Send + Sync {
    /// Signing algorithm
    fn algorithm(&self) -> Algorithm;

    /// Key identifier placed in token headers, if any
    fn key_id(&self) -> Option<&str>;

    /// Lifetime of issued access tokens
    fn access_token_ttl(&self) -> Duration;

    /// Sign `{sub, iss, aud, iat, exp}` for `subject`
    ///
    /// # Returns
    /// * `Ok(AccessToken)` - Signed token
    /// * `Err(TokenError::TokenIssuanceFailed)` - Empty issuer/audience/subject or a signing failure
    fn create_access_token(&self, subject: &str) -> Result<AccessToken, DomainError>;

    /// Verify signature, claims and expiry and return the subject
    ///
    /// # Returns
    /// * `Ok(String)` - Subject claim
    /// * `Err(TokenError::InvalidToken)` - Any verification failure
    fn parse_subject(&self, token: &str) -> Result<String, DomainError>;

    /// Public verification keys; empty for shared-secret signers
    fn public_key_set(&self) -> KeySet;
}

/// Build the signer variant matching the configured algorithm
///
/// Fails fast with `InvalidKeyMaterial` so a misconfigured process never
/// becomes ready.
pub fn build_signer(
    config: TokenSignerConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn TokenSigner>, DomainError> {
    let algorithm = config.algorithm;
    let signer: Arc<dyn TokenSigner> = if is_rsa_family(algorithm) {
        Arc::new(RsaTokenSigner::new(config, clock)?)
    } else if is_hmac_family(algorithm) {
        Arc::new(HmacTokenSigner::new(config, clock)?)
    } else {
        return Err(TokenError::InvalidKeyMaterial {
            reason: format!("unsupported algorithm {}", algorithm_name(algorithm)),
        }
        .into());
    };

    info!(
        algorithm = algorithm_name(algorithm),
        kid = signer.key_id().unwrap_or("-"),
        "token signer ready"
    );
    Ok(signer)
}
