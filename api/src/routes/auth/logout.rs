use actix_web::{web, HttpRequest, HttpResponse};
use tracing::error;

use crate::state::{AppState, REFRESH_COOKIE_NAME};

use super::cookie::clear_refresh_cookie;

/// Handler for DELETE on the refresh endpoint
///
/// Always 204 with the cookie cleared. A store failure is logged and the
/// session is left to expire on its own.
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Some(cookie) = req.cookie(REFRESH_COOKIE_NAME) {
        if let Err(e) = state.auth_service.logout(cookie.value()).await {
            error!("logout could not revoke session: {}", e);
        }
    }

    HttpResponse::NoContent()
        .cookie(clear_refresh_cookie(
            state.refresh_endpoint(),
            state.cookie_secure,
        ))
        .finish()
}
