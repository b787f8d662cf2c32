//! Domain error to HTTP response mapping
//!
//! Clients get a stable error code and a generic message. Anything that is
//! not the caller's fault is logged here with its detail and answered with a
//! bare 500.

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};
use tracing::{debug, error};
use validator::ValidationErrors;

use auth_core::errors::{AuthError, CredentialError, DomainError, SessionError, TokenError};
use auth_shared::{error_codes, ErrorResponse};

/// Convert a domain error into the response the client sees
pub fn domain_error_response(err: DomainError) -> HttpResponse {
    match err {
        DomainError::Auth(AuthError::InvalidCredentials)
        | DomainError::Credential(CredentialError::NotFound | CredentialError::Mismatch) => {
            HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::INVALID_CREDENTIALS,
                "Invalid credentials",
            ))
        }
        DomainError::Auth(AuthError::MemberAlreadyExists) => HttpResponse::Conflict().json(
            ErrorResponse::new(error_codes::CONFLICT, "A member with this email already exists"),
        ),
        DomainError::Token(TokenError::InvalidToken) => HttpResponse::Unauthorized().json(
            ErrorResponse::new(error_codes::INVALID_TOKEN, "Invalid or expired token"),
        ),
        DomainError::Session(SessionError::Invalid | SessionError::NotFound) => {
            HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::SESSION_INVALID,
                "Refresh session is invalid or expired",
            ))
        }
        DomainError::Validation { message } => {
            debug!(%message, "request rejected");
            HttpResponse::BadRequest()
                .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message))
        }
        other => internal_error_response(&other),
    }
}

/// Log `err` and answer with a generic 500
pub fn internal_error_response(err: &dyn std::fmt::Display) -> HttpResponse {
    error!(error = %err, "request failed");
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        error_codes::INTERNAL_ERROR,
        "An internal error occurred",
    ))
}

/// 400 response listing the fields that failed validation
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();
    HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        format!("Invalid fields: {}", fields.join(", ")),
    ))
}

/// Malformed JSON bodies get the same error shape as everything else
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "malformed request body");
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        "Malformed request body",
    ));
    actix_web::error::InternalError::from_response(err, response).into()
}
