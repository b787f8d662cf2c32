//! Tests for session maintenance
