//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Access token signing and verification behind the `TokenSigner` trait
//! - RSA key loading from PKCS#1 or PKCS#8 PEM
//! - Shared-secret signing for intra-service use
//! - Publication of the public key set for downstream verifiers

mod codec;
mod config;
mod hmac_signer;
mod jwks;
mod key_manager;
mod rsa_signer;
mod signer;

#[cfg(test)]
mod tests;

pub use config::{algorithm_name, SigningKeyMaterial, TokenSignerConfig};
pub use hmac_signer::HmacTokenSigner;
pub use jwks::KeySetPublisher;
pub use key_manager::RsaKeyManager;
pub use rsa_signer::RsaTokenSigner;
pub use signer::{build_signer, TokenSigner};
