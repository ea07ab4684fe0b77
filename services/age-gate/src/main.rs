use std::sync::Arc;

use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use companion_age_gate::config::AgeGateConfig;
use companion_age_gate::infra::cache::ReferenceCache;
use companion_age_gate::router::build_router;
use companion_age_gate::state::AppState;
use companion_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("companion_age_gate=info,tower_http=info");

    let config = AgeGateConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        db: Arc::new(db),
        reference_cache: ReferenceCache::new(
            config.reference_cache_capacity,
            config.reference_cache_ttl,
        ),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.age_gate_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("age-gate service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
