use axum::{extract::State, http::StatusCode};
use tracing::warn;

use companion_core::health::readiness;

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

/// Ready once the database answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let check = state.db.ping().await;
    if let Err(ref e) = check {
        warn!(error = %e, "readiness: database ping failed");
    }
    readiness(check)
}
