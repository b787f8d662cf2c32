use actix_web::{web, HttpRequest, HttpResponse};

use auth_core::errors::SessionError;

use crate::dto::TokenResponse;
use crate::handlers::error::domain_error_response;
use crate::state::{AppState, REFRESH_COOKIE_NAME};

use super::client_metadata;
use super::cookie::refresh_cookie;

/// Handler for POST on the refresh endpoint
///
/// Reads the refresh identifier from the cookie, rotates the session and
/// answers like login. The presented identifier is dead afterwards.
///
/// ## Errors
/// - 401 Unauthorized: Missing cookie, or session unknown, expired or revoked
pub async fn refresh(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let Some(cookie) = req.cookie(REFRESH_COOKIE_NAME) else {
        return domain_error_response(SessionError::Invalid.into());
    };

    match state
        .auth_service
        .refresh(cookie.value(), client_metadata(&req))
        .await
    {
        Ok(response) => HttpResponse::Ok()
            .cookie(refresh_cookie(&response, state.cookie_secure))
            .json(TokenResponse::from(&response)),
        Err(error) => domain_error_response(error),
    }
}
