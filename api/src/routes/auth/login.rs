use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::{LoginRequest, TokenResponse};
use crate::handlers::error::{domain_error_response, validation_error_response};
use crate::state::AppState;

use super::client_metadata;
use super::cookie::refresh_cookie;

/// Handler for POST /v1/auth/login
///
/// # Request Body
///
/// ```json
/// { "email": "ada@example.com", "password": "..." }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// Token body plus a `refresh_token` cookie scoped to the refresh endpoint.
/// ```json
/// { "access_token": "eyJ...", "token_type": "Bearer", "expires_in": 900 }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed body
/// - 401 Unauthorized: Invalid credentials (never says which part was wrong)
/// - 500 Internal Server Error: Signing or session storage failure
pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return validation_error_response(&errors);
    }

    let body = body.into_inner();
    match state
        .auth_service
        .login(&body.email, &body.password, client_metadata(&req))
        .await
    {
        Ok(response) => HttpResponse::Ok()
            .cookie(refresh_cookie(&response, state.cookie_secure))
            .json(TokenResponse::from(&response)),
        Err(error) => domain_error_response(error),
    }
}
