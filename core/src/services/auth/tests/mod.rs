//! Tests for the authentication session service
