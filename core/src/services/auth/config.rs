//! Configuration for the authentication session service

use auth_shared::config::{RefreshConfig, SessionConfig};

/// Version prefix shared by every public route and the refresh cookie path
pub const API_VERSION: &str = "v1";

/// Configuration for the authentication session service
#[derive(Debug, Clone)]
pub struct AuthSessionConfig {
    /// Random bytes per refresh identifier
    pub refresh_id_bytes: usize,
    /// Absolute path the refresh cookie is scoped to
    pub refresh_endpoint: String,
    /// Refresh session lifetime and cookie Max-Age, in seconds
    pub refresh_max_age_seconds: i64,
    /// Identifier attempts before session creation gives up
    pub max_create_attempts: u32,
}

impl Default for AuthSessionConfig {
    fn default() -> Self {
        Self {
            refresh_id_bytes: 32,
            refresh_endpoint: format!("/{}/auth/refresh", API_VERSION),
            refresh_max_age_seconds: 604800, // 7 days
            max_create_attempts: 3,
        }
    }
}

impl AuthSessionConfig {
    /// Build from validated application settings
    pub fn from_settings(refresh: &RefreshConfig, session: &SessionConfig) -> Self {
        Self {
            refresh_id_bytes: refresh.num_bytes,
            refresh_endpoint: format!("/{}/{}", API_VERSION, refresh.end_point),
            refresh_max_age_seconds: refresh.max_age_seconds,
            max_create_attempts: session.create_attempts,
        }
    }
}
