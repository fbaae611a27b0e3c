//! Middleware module for the Colony HTTP server
//!
//! Provides:
//! - Identity extraction from auth-layer headers
//! - Optional shared Bearer token check

pub mod auth;
