//! Property-based tests for the request builder
