//! Result of a successful login or refresh.

use std::fmt;

use crate::domain::entities::session::mask_session_id;

/// Token pair handed back to the transport layer
///
/// The access token goes in the response body; the refresh identifier is the
/// only thing the client must keep, typically in an HTTP-only cookie scoped
/// to `refresh_endpoint`.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Signed access token
    pub access_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh session identifier
    pub refresh_token_id: String,

    /// Path the refresh cookie is scoped to (`/v1/auth/refresh`)
    pub refresh_endpoint: String,

    /// Refresh cookie Max-Age in seconds
    pub refresh_max_age_seconds: i64,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"<redacted>")
            .field("access_expires_in", &self.access_expires_in)
            .field("refresh_token_id", &mask_session_id(&self.refresh_token_id))
            .field("refresh_endpoint", &self.refresh_endpoint)
            .field("refresh_max_age_seconds", &self.refresh_max_age_seconds)
            .finish()
    }
}
