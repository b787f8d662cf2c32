//! Refresh cookie construction

use actix_web::cookie::{time::Duration, Cookie, SameSite};

use auth_core::domain::LoginResponse;

use crate::state::REFRESH_COOKIE_NAME;

/// Cookie carrying a freshly issued refresh identifier
///
/// HttpOnly and SameSite=Lax always; scoped to the refresh endpoint so the
/// browser sends it nowhere else.
pub fn refresh_cookie(response: &LoginResponse, secure: bool) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE_NAME, response.refresh_token_id.clone())
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(response.refresh_endpoint.clone())
        .max_age(Duration::seconds(response.refresh_max_age_seconds))
        .finish()
}

/// Expired cookie that makes the browser drop the refresh identifier
pub fn clear_refresh_cookie(path: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE_NAME, "")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(path.to_string())
        .max_age(Duration::ZERO)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_response() -> LoginResponse {
        LoginResponse {
            access_token: "header.payload.signature".to_string(),
            access_expires_in: 900,
            refresh_token_id: "abcdef0123456789".to_string(),
            refresh_endpoint: "/v1/auth/refresh".to_string(),
            refresh_max_age_seconds: 604800,
        }
    }

    #[test]
    fn test_refresh_cookie_attributes() {
        let header = refresh_cookie(&login_response(), true).to_string();

        assert!(header.starts_with("refresh_token=abcdef0123456789"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/v1/auth/refresh"));
        assert!(header.contains("Max-Age=604800"));
    }

    #[test]
    fn test_insecure_cookie_for_local_development() {
        let header = refresh_cookie(&login_response(), false).to_string();
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let header = clear_refresh_cookie("/v1/auth/refresh", true).to_string();

        assert!(header.starts_with("refresh_token=;"));
        assert!(header.contains("Max-Age=0"));
    }
}
