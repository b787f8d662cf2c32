//! Request and response bodies

pub mod auth_dto;

pub use auth_dto::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse};
