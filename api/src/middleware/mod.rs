//! Middleware configuration

pub mod cors;
