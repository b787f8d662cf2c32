use actix_web::{web, HttpResponse};
use validator::Validate;

use auth_core::domain::NewMember;

use crate::dto::{RegisterRequest, RegisterResponse};
use crate::handlers::error::{domain_error_response, validation_error_response};
use crate::state::AppState;

/// Handler for POST /v1/auth/register
///
/// Returns 201 with the new member ID, 409 when the email is taken.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return validation_error_response(&errors);
    }

    let body = body.into_inner();
    let new_member = NewMember {
        email: body.email,
        name: body.name,
        password: body.password,
    };

    match state.members.register(new_member).await {
        Ok(member) => HttpResponse::Created().json(RegisterResponse {
            id: member.id.to_string(),
        }),
        Err(error) => domain_error_response(error),
    }
}
