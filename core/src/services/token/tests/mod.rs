//! Tests for token signers and key publication

mod rs256_tests;

use crate::errors::{DomainError, TokenError};

/// Replace the first character of the signature segment
pub(super) fn tamper_signature(token: &str) -> String {
    let (signed_part, signature) = token.rsplit_once('.').expect("token has three parts");
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    format!("{}.{}", signed_part, chars.into_iter().collect::<String>())
}

pub(super) fn is_invalid_token(err: &DomainError) -> bool {
    matches!(err, DomainError::Token(TokenError::InvalidToken))
}

pub(super) fn is_invalid_key_material(err: &DomainError) -> bool {
    matches!(err, DomainError::Token(TokenError::InvalidKeyMaterial { .. }))
}
