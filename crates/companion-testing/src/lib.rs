//! Test utilities for Companion services.
//!
//! Import from `[dev-dependencies]` only.

pub mod auth;
