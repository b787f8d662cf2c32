use actix_web::{http::header, web, HttpResponse};

use crate::handlers::error::domain_error_response;
use crate::state::AppState;

/// Handler for GET on the key set path
///
/// Serves `{"keys":[...]}`; symmetric signers publish an empty list.
pub async fn key_set(state: web::Data<AppState>) -> HttpResponse {
    match state.key_set.document() {
        Ok(document) => HttpResponse::Ok()
            .content_type("application/json")
            .insert_header((header::CACHE_CONTROL, "public, max-age=300"))
            .body(document),
        Err(error) => domain_error_response(error),
    }
}
