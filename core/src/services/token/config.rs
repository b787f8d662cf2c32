//! Configuration for token signers

use std::fmt;
use std::str::FromStr;

use auth_shared::config::JwtConfig;
use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::errors::{DomainError, TokenError};

/// Key material a signer is built from
#[derive(Clone)]
pub enum SigningKeyMaterial {
    /// PEM-encoded RSA private key, PKCS#1 or PKCS#8
    RsaPem(String),
    /// Shared secret for HMAC algorithms
    Secret(String),
}

impl fmt::Debug for SigningKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningKeyMaterial::RsaPem(_) => f.write_str("RsaPem(<redacted>)"),
            SigningKeyMaterial::Secret(_) => f.write_str("Secret(<redacted>)"),
        }
    }
}

/// Configuration for a token signer
#[derive(Debug, Clone)]
pub struct TokenSignerConfig {
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// Signing key
    pub key: SigningKeyMaterial,
    /// Key identifier placed in the `kid` header (may be empty for HMAC)
    pub key_id: String,
    pub issuer: String,
    pub audience: String,
    /// Access token lifetime
    pub expire: Duration,
    /// Clock skew tolerated when checking expiry
    pub leeway_seconds: i64,
}

impl TokenSignerConfig {
    /// Build signer configuration from validated application settings
    ///
    /// Reads the key file when only a path is configured. Problems with the
    /// key material are reported as `InvalidKeyMaterial`.
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            TokenError::InvalidKeyMaterial {
                reason: format!("unsupported algorithm '{}'", config.algorithm),
            }
        })?;

        let key = if config.is_symmetric() {
            let secret = config.secret.clone().ok_or_else(|| TokenError::InvalidKeyMaterial {
                reason: "shared secret is not set".to_string(),
            })?;
            SigningKeyMaterial::Secret(secret)
        } else {
            let pem = config
                .resolve_private_key_pem()
                .map_err(|e| TokenError::InvalidKeyMaterial {
                    reason: e.to_string(),
                })?;
            SigningKeyMaterial::RsaPem(pem)
        };

        let expire = config
            .expire_seconds()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| TokenError::InvalidKeyMaterial {
                reason: format!("token lifetime of {} minutes is out of range", config.expire_minutes),
            })?;

        Ok(Self {
            algorithm,
            key,
            key_id: config.key_id.clone(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expire,
            leeway_seconds: config.leeway_seconds,
        })
    }
}

/// Canonical name of an algorithm as used in headers and key sets
pub fn algorithm_name(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::HS256 => "HS256",
        Algorithm::HS384 => "HS384",
        Algorithm::HS512 => "HS512",
        Algorithm::RS256 => "RS256",
        Algorithm::RS384 => "RS384",
        Algorithm::RS512 => "RS512",
        Algorithm::PS256 => "PS256",
        Algorithm::PS384 => "PS384",
        Algorithm::PS512 => "PS512",
        Algorithm::ES256 => "ES256",
        Algorithm::ES384 => "ES384",
        Algorithm::EdDSA => "EdDSA",
    }
}

pub(crate) fn is_rsa_family(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}

pub(crate) fn is_hmac_family(algorithm: Algorithm) -> bool {
    matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}
