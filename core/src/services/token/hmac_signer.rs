//! Shared-secret signer for intra-service use

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::clock::Clock;
use crate::domain::entities::key_set::KeySet;
use crate::domain::entities::token::AccessToken;
use crate::errors::{DomainError, TokenError};

use super::codec::{CodecParams, JwtCodec};
use super::config::{algorithm_name, is_hmac_family, SigningKeyMaterial, TokenSignerConfig};
use super::signer::TokenSigner;

/// Signer for HS256/384/512
///
/// There is no public key to publish, so `public_key_set` is empty.
pub struct HmacTokenSigner {
    codec: JwtCodec,
}

impl HmacTokenSigner {
    pub fn new(config: TokenSignerConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        if !is_hmac_family(config.algorithm) {
            return Err(invalid_key(format!(
                "{} is not an HMAC algorithm",
                algorithm_name(config.algorithm)
            )));
        }
        let secret = match &config.key {
            SigningKeyMaterial::Secret(secret) if !secret.is_empty() => secret.as_bytes(),
            SigningKeyMaterial::Secret(_) => return Err(invalid_key("shared secret is empty")),
            SigningKeyMaterial::RsaPem(_) => {
                return Err(invalid_key("HMAC algorithms need a shared secret"))
            }
        };

        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);
        let key_id = Some(config.key_id.trim().to_string()).filter(|kid| !kid.is_empty());

        let codec = JwtCodec::new(
            CodecParams {
                algorithm: config.algorithm,
                key_id,
                issuer: config.issuer,
                audience: config.audience,
                expire: config.expire,
                leeway_seconds: config.leeway_seconds,
            },
            encoding_key,
            decoding_key,
            clock,
        );

        Ok(Self { codec })
    }
}

impl TokenSigner for HmacTokenSigner {
    fn algorithm(&self) -> Algorithm {
        self.codec.algorithm()
    }

    fn key_id(&self) -> Option<&str> {
        self.codec.key_id()
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
        KeySet::empty()
    }
}

fn invalid_key(reason: impl Into<String>) -> DomainError {
    TokenError::InvalidKeyMaterial {
        reason: reason.into(),
    }
    .into()
}
