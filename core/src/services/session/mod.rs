//! Refresh session maintenance
//!
//! Terminal sessions stay readable for a retention window after expiry so an
//! identifier is never reused while a client may still present it; the
//! cleanup service purges them afterwards.

mod cleanup;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, SessionCleanupConfig, SessionCleanupService};
