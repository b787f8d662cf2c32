//! # Auth API
//!
//! actix-web transport for the auth service: login, registration, refresh
//! rotation, logout, key discovery and health. Handlers stay thin; every
//! decision lives in `auth_core`.

pub mod app;
pub mod bootstrap;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use state::AppState;
