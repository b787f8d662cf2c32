//! Test fixtures: key material, a controllable clock and a fixed credential verifier.
//!
//! Compiled for unit tests and, with the `test-util` feature, for other crates'
//! tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::Algorithm;

use crate::clock::Clock;
use crate::errors::CredentialError;
use crate::repositories::CredentialVerifier;
use crate::services::token::{SigningKeyMaterial, TokenSignerConfig};

/// 2048-bit RSA key, PKCS#1 PEM
pub const RSA_PKCS1_PEM: &str = include_str!("../keys/test_rsa_pkcs1.pem");

/// Same key as `RSA_PKCS1_PEM`, PKCS#8 PEM
pub const RSA_PKCS8_PEM: &str = include_str!("../keys/test_rsa_pkcs8.pem");

/// An unrelated RSA key
pub const RSA_OTHER_PEM: &str = include_str!("../keys/test_rsa_other.pem");

/// P-256 key, PKCS#8 PEM
pub const EC_PKCS8_PEM: &str = include_str!("../keys/test_ec_pkcs8.pem");

/// Modulus of the fixture RSA key, base64url without padding
pub const RSA_MODULUS_B64: &str = "x8U-ir8_yiM63l1IH0PXDkc-yFw0Rbv4g-JBNpchYar179LENTaI5JY3f9xR_fAL9PzuliK4BGKlfD7XMYMWE4j-5oAk8LAq6HwT0wfu8Hi2L3toCSiIV8Hz6iXD4Uw-mcyQgEet86JzXG2qsOmeh7pAk1quU2gidX0J366OEauHHovlI34TI2QSsZAge9vxh3f6ptZTN6qUyVNlzHnUkztV5E_gLnXZ_fOhVJDi1aVVIjW_2Ml2YL1e3NqUViIS38rV579K7JvAB3FxUiV41_ozij6W0O_rNhUK_F-O1guO9y6fIRI0AaG8O8an19tbVMe0Wa-zaXw-pTdx8T_18w";

/// Public exponent (65537) of the fixture RSA key
pub const RSA_EXPONENT_B64: &str = "AQAB";

pub const TEST_KEY_ID: &str = "test-key-1";
pub const TEST_ISSUER: &str = "auth.example";
pub const TEST_AUDIENCE: &str = "api.example";

/// RS256 signer configuration over the fixture key
pub fn rsa_signer_config() -> TokenSignerConfig {
    TokenSignerConfig {
        algorithm: Algorithm::RS256,
        key: SigningKeyMaterial::RsaPem(RSA_PKCS1_PEM.to_string()),
        key_id: TEST_KEY_ID.to_string(),
        issuer: TEST_ISSUER.to_string(),
        audience: TEST_AUDIENCE.to_string(),
        expire: Duration::minutes(15),
        leeway_seconds: 0,
    }
}

/// HS256 signer configuration with a fixed secret
pub fn hmac_signer_config() -> TokenSignerConfig {
    TokenSignerConfig {
        algorithm: Algorithm::HS256,
        key: SigningKeyMaterial::Secret("0123456789abcdef0123456789abcdef".to_string()),
        key_id: String::new(),
        issuer: TEST_ISSUER.to_string(),
        audience: TEST_AUDIENCE.to_string(),
        expire: Duration::minutes(15),
        leeway_seconds: 0,
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Clock starting at 2024-01-01T00:00:00Z
    pub fn fixed() -> Arc<Self> {
        Arc::new(Self::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Credential verifier over a fixed identifier -> (secret, subject) table
#[derive(Debug, Default, Clone)]
pub struct StaticCredentialVerifier {
    entries: HashMap<String, (String, String)>,
}

impl StaticCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, identifier: &str, secret: &str, subject: &str) -> Self {
        self.entries.insert(
            identifier.to_string(),
            (secret.to_string(), subject.to_string()),
        );
        self
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<String, CredentialError> {
        let (expected, subject) = self
            .entries
            .get(identifier)
            .ok_or(CredentialError::NotFound)?;
        if expected != secret {
            return Err(CredentialError::Mismatch);
        }
        Ok(subject.clone())
    }
}
