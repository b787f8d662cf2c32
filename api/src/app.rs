//! Application factory
//!
//! Builds the actix-web `App` with tracing, CORS, the version header and all
//! routes. Used by `main` for every worker and by the integration tests.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::DefaultHeaders,
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use auth_core::services::auth::API_VERSION;
use auth_shared::config::CorsConfig;
use auth_shared::{error_codes, ErrorResponse};

use crate::handlers::error::json_error_handler;
use crate::middleware::cors::create_cors;
use crate::routes::{auth, health, jwks};
use crate::state::AppState;

/// Header carrying the API version on every response
pub const VERSION_HEADER: &str = "X-Version-Id";

/// Create and configure the application
pub fn create_app(
    state: web::Data<AppState>,
    cors: &CorsConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let refresh_endpoint = state.refresh_endpoint().to_string();
    let jwks_path = state.jwks_path.clone();

    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // Middleware runs bottom-up: tracing sees every request first
        .wrap(DefaultHeaders::new().add((VERSION_HEADER, API_VERSION)))
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health::health_check))
        .route(&jwks_path, web::get().to(jwks::key_set))
        .service(
            web::scope(&format!("/{}/auth", API_VERSION))
                .route("/login", web::post().to(auth::login::login))
                .route("/register", web::post().to(auth::register::register)),
        )
        // Refresh and logout share the cookie path
        .service(
            web::resource(refresh_endpoint)
                .route(web::post().to(auth::refresh::refresh))
                .route(web::delete().to(auth::logout::logout)),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
