//! Identity types shared across Companion services.
//!
//! Sessions are terminated at the gateway; services only see the
//! `IdentityHeaders` it injects.

pub mod identity;
