//! Asymmetric signer: RSA private key, published public key set

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::clock::Clock;
use crate::domain::entities::key_set::{KeySet, VerificationKey};
use crate::domain::entities::token::AccessToken;
use crate::errors::{DomainError, TokenError};

use super::codec::{CodecParams, JwtCodec};
use super::config::{algorithm_name, is_rsa_family, SigningKeyMaterial, TokenSignerConfig};
use super::key_manager::RsaKeyManager;
use super::signer::TokenSigner;

/// Signer for RS256/384/512 and PS256/384/512
pub struct RsaTokenSigner {
    codec: JwtCodec,
    key_id: String,
    modulus: String,
    exponent: String,
}

impl RsaTokenSigner {
    /// Decode the key and prepare signing and verification
    ///
    /// # Returns
    ///
    /// * `Ok(RsaTokenSigner)` - Ready to sign
    /// * `Err(TokenError::InvalidKeyMaterial)` - Non-RSA algorithm, missing
    ///   key id, or a PEM that does not hold an RSA private key
    pub fn new(config: TokenSignerConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        if !is_rsa_family(config.algorithm) {
            return Err(invalid_key(format!(
                "{} is not an RSA algorithm",
                algorithm_name(config.algorithm)
            )));
        }
        let pem = match &config.key {
            SigningKeyMaterial::RsaPem(pem) if !pem.trim().is_empty() => pem,
            SigningKeyMaterial::RsaPem(_) => return Err(invalid_key("private key PEM is empty")),
            SigningKeyMaterial::Secret(_) => {
                return Err(invalid_key("RSA algorithms need a PEM private key"))
            }
        };
        if config.key_id.trim().is_empty() {
            return Err(invalid_key("key id must not be empty"));
        }

        let keys = RsaKeyManager::from_pem(pem)?;
        let codec = JwtCodec::new(
            CodecParams {
                algorithm: config.algorithm,
                key_id: Some(config.key_id.clone()),
                issuer: config.issuer,
                audience: config.audience,
                expire: config.expire,
                leeway_seconds: config.leeway_seconds,
            },
            keys.encoding_key().clone(),
            keys.decoding_key().clone(),
            clock,
        );

        Ok(Self {
            codec,
            key_id: config.key_id,
            modulus: keys.modulus().to_string(),
            exponent: keys.exponent().to_string(),
        })
    }
}

impl TokenSigner for RsaTokenSigner {
    fn algorithm(&self) -> Algorithm {
        self.codec.algorithm()
    }

    fn key_id(&self) -> Option<&str> {
        Some(&self.key_id)
    }

    fn access_token_ttl(&self) -> Duration {
        self.codec.expire()
    }

    fn create_access_token(&self, subject: &str) -> Result<AccessToken, DomainError> {
        Ok(self.codec.sign(subject)?)
    }

    fn parse_subject(&self, token: &str) -> Result<String, DomainError> {
        Ok(self.codec.parse_subject(token)?)
    }

    fn public_key_set(&self) -> KeySet {
        KeySet::single(VerificationKey::rsa(
            algorithm_name(self.codec.algorithm()),
            &self.key_id,
            self.modulus.clone(),
            self.exponent.clone(),
        ))
    }
}

fn invalid_key(reason: impl Into<String>) -> DomainError {
    TokenError::InvalidKeyMaterial {
        reason: reason.into(),
    }
    .into()
}
