//! Authentication route handlers
//!
//! - Login and registration under `/v1/auth`
//! - Refresh rotation and logout on the refresh cookie path

pub mod cookie;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;

use actix_web::{http::header, HttpRequest};

use auth_core::domain::ClientMetadata;

/// Client details recorded on the refresh session
pub(crate) fn client_metadata(req: &HttpRequest) -> ClientMetadata {
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let ip_address = req.peer_addr().map(|addr| addr.ip().to_string());
    ClientMetadata::new(user_agent, ip_address)
}
