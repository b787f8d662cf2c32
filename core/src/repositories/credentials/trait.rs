//! Credential verification seam used by login.

use async_trait::async_trait;

use crate::errors::CredentialError;

/// Checks an identifier/secret pair against the member store
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify credentials and return the subject identifier
    ///
    /// # Returns
    /// * `Ok(String)` - Subject (member ID) the credentials belong to
    /// * `Err(CredentialError::NotFound)` - Unknown identifier
    /// * `Err(CredentialError::Mismatch)` - Secret does not match
    /// * `Err(CredentialError::Unavailable)` - The store could not be consulted
    async fn verify_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<String, CredentialError>;
}
