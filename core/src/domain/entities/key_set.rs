//! Public verification keys published for out-of-process token verification

use serde::{Deserialize, Serialize};

/// One public verification key in JWK form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// Key type, always `RSA`
    pub kty: String,

    /// Intended use, always `sig`
    #[serde(rename = "use")]
    pub key_use: String,

    /// Signing algorithm (`RS256`, `PS256`, ...)
    pub alg: String,

    /// Key identifier matching the `kid` token header
    pub kid: String,

    /// Modulus, base64url without padding
    pub n: String,

    /// Public exponent, base64url without padding
    pub e: String,
}

impl VerificationKey {
    pub fn rsa(alg: &str, kid: &str, n: String, e: String) -> Self {
        Self {
            kty: String::from("RSA"),
            key_use: String::from("sig"),
            alg: alg.to_string(),
            kid: kid.to_string(),
            n,
            e,
        }
    }
}

/// Ordered collection of verification keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub keys: Vec<VerificationKey>,
}

impl KeySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(key: VerificationKey) -> Self {
        Self { keys: vec![key] }
    }

    /// Find the key a verifier should use for the given `kid`
    pub fn find(&self, kid: &str) -> Option<&VerificationKey> {
        self.keys.iter().find(|key| key.kid == kid)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
