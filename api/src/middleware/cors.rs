//! CORS middleware configuration for cross-origin requests.
//!
//! Origins come from `AUTH_CORS_PUBLIC_ALLOWED_ORIGINS`: an empty list allows
//! none, `*` allows any, anything else is an explicit allow-list.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use auth_shared::config::CorsConfig;

/// Creates a CORS middleware instance from configuration.
///
/// Credentials are only supported when enabled, since the refresh cookie is
/// the only credential the browser would send.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-version-id")])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        info!("Configuring CORS to allow any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            info!("Adding allowed origin: {}", origin);
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
