use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use companion_core::health::healthz;
use companion_core::middleware::request_id_layer;

use crate::handlers::{
    access::{check_feature_access, get_accessible_features, get_restricted_features},
    admin::{
        delete_feature_rule, revoke_override, upsert_feature_rule, upsert_override,
        upsert_persona_behavior,
    },
    health::readyz,
    persona::get_persona_behavior,
    verification::{get_status, verify_age},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Verification
        .route("/api/age-verification/verify", post(verify_age))
        .route("/api/age-verification/status", get(get_status))
        // Feature access
        .route(
            "/api/age-verification/feature-access/{feature_key}",
            get(check_feature_access),
        )
        .route(
            "/api/age-verification/accessible-features",
            get(get_accessible_features),
        )
        .route(
            "/api/age-verification/restricted-features",
            get(get_restricted_features),
        )
        // Persona behavior
        .route(
            "/api/age-verification/persona-behavior/{persona_id}",
            get(get_persona_behavior),
        )
        // Admin
        .route(
            "/api/age-verification/admin/feature-rules/{feature_key}",
            put(upsert_feature_rule).delete(delete_feature_rule),
        )
        .route(
            "/api/age-verification/admin/overrides/{user_id}/{feature_key}",
            put(upsert_override).delete(revoke_override),
        )
        .route(
            "/api/age-verification/admin/persona-behaviors/{persona_id}",
            put(upsert_persona_behavior),
        )
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
