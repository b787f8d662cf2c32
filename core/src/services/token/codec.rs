//! JWT encoding and verification shared by the signer variants

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::clock::Clock;
use crate::domain::entities::token::{AccessToken, Claims};
use crate::errors::TokenError;

/// Claims a token must carry to be accepted
const REQUIRED_CLAIMS: &[&str] = &["sub", "iss", "aud", "exp"];

/// Signs and verifies access tokens for one key
pub(crate) struct JwtCodec {
    algorithm: Algorithm,
    key_id: Option<String>,
    issuer: String,
    audience: String,
    expire: Duration,
    leeway_seconds: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

/// Parameters for a codec; keys are supplied separately by each variant
pub(crate) struct CodecParams {
    pub algorithm: Algorithm,
    pub key_id: Option<String>,
    pub issuer: String,
    pub audience: String,
    pub expire: Duration,
    pub leeway_seconds: i64,
}

impl JwtCodec {
    pub(crate) fn new(
        params: CodecParams,
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // Expiry is checked against the injected clock in `verify`
        let mut validation = Validation::new(params.algorithm);
        validation.validate_exp = false;
        validation.set_required_spec_claims(REQUIRED_CLAIMS);
        validation.set_issuer(&[params.issuer.as_str()]);
        validation.set_audience(&[params.audience.as_str()]);

        Self {
            algorithm: params.algorithm,
            key_id: params.key_id,
            issuer: params.issuer,
            audience: params.audience,
            expire: params.expire,
            leeway_seconds: params.leeway_seconds,
            encoding_key,
            decoding_key,
            validation,
            clock,
        }
    }

    pub(crate) fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    pub(crate) fn expire(&self) -> Duration {
        self.expire
    }

    /// Build and sign `{sub, iss, aud, iat, exp}` for `subject`
    pub(crate) fn sign(&self, subject: &str) -> Result<AccessToken, TokenError> {
        if self.issuer.is_empty() || self.audience.is_empty() {
            return Err(TokenError::TokenIssuanceFailed {
                reason: "issuer and audience must be set".to_string(),
            });
        }
        if subject.is_empty() {
            return Err(TokenError::TokenIssuanceFailed {
                reason: "subject must not be empty".to_string(),
            });
        }

        let issued_at = self.clock.now();
        let expires_at = issued_at.checked_add_signed(self.expire).ok_or_else(|| {
            TokenError::TokenIssuanceFailed {
                reason: "token lifetime is out of range".to_string(),
            }
        })?;
        let claims = Claims::new(subject, &self.issuer, &self.audience, issued_at, expires_at);

        let mut header = Header::new(self.algorithm);
        header.kid = self.key_id.clone();

        let token = encode(&header, &claims, &self.encoding_key).map_err(|e| {
            TokenError::TokenIssuanceFailed {
                reason: e.to_string(),
            }
        })?;

        Ok(AccessToken::new(token, issued_at, expires_at))
    }

    /// Verify a token and return its subject
    ///
    /// Every failure maps to `InvalidToken`; the cause is only logged.
    pub(crate) fn parse_subject(&self, token: &str) -> Result<String, TokenError> {
        match self.verify(token) {
            Ok(claims) => Ok(claims.sub),
            Err(reason) => {
                debug!(reason = %reason, "access token rejected");
                Err(TokenError::InvalidToken)
            }
        }
    }

    fn verify(&self, token: &str) -> Result<Claims, String> {
        let header = decode_header(token).map_err(|e| format!("malformed header: {}", e))?;
        if header.alg != self.algorithm {
            return Err(format!("unexpected algorithm {:?}", header.alg));
        }
        if let Some(expected) = &self.key_id {
            if header.kid.as_deref() != Some(expected.as_str()) {
                return Err("key id mismatch".to_string());
            }
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| e.to_string())?;

        let now = self.clock.now().timestamp();
        if now >= data.claims.exp.saturating_add(self.leeway_seconds) {
            return Err("token expired".to_string());
        }

        Ok(data.claims)
    }
}
