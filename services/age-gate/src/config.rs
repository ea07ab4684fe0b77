use std::time::Duration;

use anyhow::Context as _;

/// Age-gate service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AgeGateConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3120). Env var: `AGE_GATE_PORT`.
    pub age_gate_port: u16,
    /// Lifetime of cached feature rules and persona behaviors (default 300s).
    /// Env var: `REFERENCE_CACHE_TTL_SECS`.
    pub reference_cache_ttl: Duration,
    /// Maximum cached reference entries (default 1024). Env var: `REFERENCE_CACHE_CAPACITY`.
    pub reference_cache_capacity: u64,
}

impl AgeGateConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            age_gate_port: parse_or("AGE_GATE_PORT", 3120)?,
            reference_cache_ttl: Duration::from_secs(parse_or("REFERENCE_CACHE_TTL_SECS", 300)?),
            reference_cache_capacity: parse_or("REFERENCE_CACHE_CAPACITY", 1024)?,
        })
    }
}

/// Read `key` as `T`, falling back to `default` when unset. A set but unparsable value is an error.
fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
