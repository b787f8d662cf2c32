//! Tests for domain entities

mod session_tests;
