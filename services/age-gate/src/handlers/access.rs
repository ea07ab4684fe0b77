use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Serialize;

use companion_auth_types::identity::IdentityHeaders;

use crate::error::AgeGateError;
use crate::state::AppState;
use crate::usecase::access::{
    CheckFeatureAccessUseCase, ListAccessibleFeaturesUseCase, ListRestrictedFeaturesUseCase,
    RestrictedFeature,
};

// ── GET /api/age-verification/feature-access/{feature_key} ──────────────────

#[derive(Serialize)]
pub struct FeatureAccessResponse {
    pub success: bool,
    pub feature_key: String,
    pub accessible: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age_required: Option<u32>,
}

pub async fn check_feature_access(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(feature_key): Path<String>,
) -> Result<Json<FeatureAccessResponse>, AgeGateError> {
    let usecase = CheckFeatureAccessUseCase {
        verifications: state.verification_repo(),
        rules: state.rule_repo(),
        overrides: state.override_repo(),
        now: Utc::now(),
    };
    let decision = usecase.execute(identity.user_id, &feature_key).await?;
    Ok(Json(FeatureAccessResponse {
        success: true,
        feature_key,
        accessible: decision.accessible,
        reason: decision.reason,
        min_age_required: decision.min_age_required,
    }))
}

// ── GET /api/age-verification/accessible-features ───────────────────────────

#[derive(Serialize)]
pub struct AccessibleFeaturesResponse {
    pub success: bool,
    pub features: Vec<String>,
    pub count: usize,
}

pub async fn get_accessible_features(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<AccessibleFeaturesResponse>, AgeGateError> {
    let usecase = ListAccessibleFeaturesUseCase {
        verifications: state.verification_repo(),
        rules: state.rule_repo(),
        overrides: state.override_repo(),
        now: Utc::now(),
    };
    let features = usecase.execute(identity.user_id).await?;
    Ok(Json(AccessibleFeaturesResponse {
        success: true,
        count: features.len(),
        features,
    }))
}

// ── GET /api/age-verification/restricted-features ───────────────────────────

#[derive(Serialize)]
pub struct RestrictedFeatureItem {
    pub feature_key: String,
    pub feature_name: String,
    pub min_age_required: u32,
    pub reason: String,
    pub years_until_access: Option<u32>,
}

impl From<RestrictedFeature> for RestrictedFeatureItem {
    fn from(feature: RestrictedFeature) -> Self {
        Self {
            feature_key: feature.feature_key,
            feature_name: feature.feature_name,
            min_age_required: feature.min_age_required,
            reason: feature.reason,
            years_until_access: feature.years_until_access,
        }
    }
}

#[derive(Serialize)]
pub struct RestrictedFeaturesResponse {
    pub success: bool,
    pub restricted_features: Vec<RestrictedFeatureItem>,
    pub count: usize,
}

pub async fn get_restricted_features(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<RestrictedFeaturesResponse>, AgeGateError> {
    let usecase = ListRestrictedFeaturesUseCase {
        verifications: state.verification_repo(),
        rules: state.rule_repo(),
        overrides: state.override_repo(),
        now: Utc::now(),
    };
    let restricted: Vec<RestrictedFeatureItem> = usecase
        .execute(identity.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(RestrictedFeaturesResponse {
        success: true,
        count: restricted.len(),
        restricted_features: restricted,
    }))
}
