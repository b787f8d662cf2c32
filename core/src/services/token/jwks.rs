//! Key discovery document publication

use std::sync::Arc;

use crate::domain::entities::key_set::KeySet;
use crate::errors::DomainError;

use super::signer::TokenSigner;

/// Publishes the signer's public keys as a JWK set document
///
/// Holds no state of its own; the document is rebuilt from the signer on
/// every call, so it is safe to serve per request.
#[derive(Clone)]
pub struct KeySetPublisher {
    signer: Arc<dyn TokenSigner>,
}

impl KeySetPublisher {
    pub fn new(signer: Arc<dyn TokenSigner>) -> Self {
        Self { signer }
    }

    /// Current key set
    pub fn key_set(&self) -> KeySet {
        self.signer.public_key_set()
    }

    /// `{"keys":[{kty,use,alg,kid,n,e}]}` as JSON text
    pub fn document(&self) -> Result<String, DomainError> {
        serde_json::to_string(&self.key_set())
            .map_err(|e| DomainError::internal(format!("failed to serialize key set: {}", e)))
    }
}
