//! Shared application state handed to every handler

use std::sync::Arc;

use auth_core::repositories::MemberRepository;
use auth_core::services::{AuthSessionService, KeySetPublisher};

/// Name of the cookie carrying the refresh session identifier
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Services and settings shared across workers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthSessionService>,
    pub members: Arc<dyn MemberRepository>,
    pub key_set: Arc<KeySetPublisher>,
    /// Whether the refresh cookie carries the `Secure` attribute
    pub cookie_secure: bool,
    /// Path the key set document is served at
    pub jwks_path: String,
}

impl AppState {
    /// Path the refresh cookie is scoped to; refresh and logout live here
    pub fn refresh_endpoint(&self) -> &str {
        &self.auth_service.config().refresh_endpoint
    }
}
