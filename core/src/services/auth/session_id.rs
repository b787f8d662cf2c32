//! Refresh session identifier generation

use auth_shared::config::auth::MIN_REFRESH_NUM_BYTES;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Produces candidate refresh session identifiers
pub trait SessionIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Identifiers drawn from the OS CSPRNG, encoded base64url without padding
#[derive(Debug, Clone)]
pub struct RandomSessionIdGenerator {
    num_bytes: usize,
}

impl RandomSessionIdGenerator {
    /// `num_bytes` is raised to the 128-bit minimum if smaller
    pub fn new(num_bytes: usize) -> Self {
        Self {
            num_bytes: num_bytes.max(MIN_REFRESH_NUM_BYTES),
        }
    }

    pub fn num_bytes(&self) -> usize {
        self.num_bytes
    }
}

impl SessionIdGenerator for RandomSessionIdGenerator {
    fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.num_bytes];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_identifiers_are_unique_and_url_safe() {
        let generator = RandomSessionIdGenerator::new(32);
        let ids: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();

        assert_eq!(ids.len(), 1000);
        for id in &ids {
            // 32 bytes -> 43 base64url characters
            assert_eq!(id.len(), 43);
            assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_entropy_is_never_below_minimum() {
        let generator = RandomSessionIdGenerator::new(4);
        assert_eq!(generator.num_bytes(), MIN_REFRESH_NUM_BYTES);
        assert_eq!(generator.generate().len(), 22);
    }
}
