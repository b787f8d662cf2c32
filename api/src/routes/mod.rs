//! Route handlers, one file per endpoint

pub mod auth;
pub mod health;
pub mod jwks;
