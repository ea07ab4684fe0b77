//! Service plumbing shared by Companion HTTP services.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
