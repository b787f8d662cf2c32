//! Tests for refresh session stores
