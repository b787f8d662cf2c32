//! Member entity used for registration and credential verification

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// bcrypt only reads this many bytes of a password; longer ones are refused
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Registered member
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,

    /// Normalized (trimmed, lowercase) email
    pub email: String,

    pub name: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(email: &str, name: &str, password_hash: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: Self::normalize_email(email),
            name: name.trim().to_string(),
            password_hash,
            created_at,
        }
    }

    /// Emails compare case-insensitively and ignore surrounding whitespace
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Registration input; the password is plain text until the repository hashes it
#[derive(Clone)]
pub struct NewMember {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl fmt::Debug for NewMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewMember")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
