use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use companion_auth_types::identity::IdentityHeaders;
use companion_domain::user::UserRole;

use crate::domain::types::{FeatureRule, PersonaBehavior};
use crate::error::AgeGateError;
use crate::handlers::json_body;
use crate::state::AppState;
use crate::usecase::admin::{
    DeleteFeatureRuleUseCase, RevokeOverrideUseCase, UpsertFeatureRuleUseCase,
    UpsertOverrideInput, UpsertOverrideUseCase, UpsertPersonaBehaviorUseCase,
};

fn require_role(identity: &IdentityHeaders, required: UserRole) -> Result<(), AgeGateError> {
    if UserRole::allows(identity.user_role, required) {
        Ok(())
    } else {
        Err(AgeGateError::Forbidden)
    }
}

// ── PUT /api/age-verification/admin/feature-rules/{feature_key} ─────────────

#[derive(Deserialize)]
pub struct FeatureRuleRequest {
    pub feature_name: String,
    pub description: Option<String>,
    pub min_age_required: u32,
    #[serde(default)]
    pub teen_accessible: bool,
    #[serde(default)]
    pub adult_only: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub compliance_note: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
pub struct FeatureRuleResponse {
    pub success: bool,
    pub feature_key: String,
    pub feature_name: String,
    pub description: Option<String>,
    pub min_age_required: u32,
    pub teen_accessible: bool,
    pub adult_only: bool,
    pub is_active: bool,
    pub compliance_note: Option<String>,
}

pub async fn upsert_feature_rule(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(feature_key): Path<String>,
    body: Result<Json<FeatureRuleRequest>, JsonRejection>,
) -> Result<Json<FeatureRuleResponse>, AgeGateError> {
    require_role(&identity, UserRole::Admin)?;
    let body = json_body(
        body,
        AgeGateError::InvalidFeatureRule("request body must be a valid JSON object"),
    )?;
    let usecase = UpsertFeatureRuleUseCase {
        repo: state.rule_repo(),
    };
    let rule = usecase
        .execute(FeatureRule {
            feature_key,
            feature_name: body.feature_name,
            description: body.description,
            min_age_required: body.min_age_required,
            teen_accessible: body.teen_accessible,
            adult_only: body.adult_only,
            is_active: body.is_active,
            compliance_note: body.compliance_note,
        })
        .await?;
    Ok(Json(FeatureRuleResponse {
        success: true,
        feature_key: rule.feature_key,
        feature_name: rule.feature_name,
        description: rule.description,
        min_age_required: rule.min_age_required,
        teen_accessible: rule.teen_accessible,
        adult_only: rule.adult_only,
        is_active: rule.is_active,
        compliance_note: rule.compliance_note,
    }))
}

// ── DELETE /api/age-verification/admin/feature-rules/{feature_key} ──────────

pub async fn delete_feature_rule(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(feature_key): Path<String>,
) -> Result<StatusCode, AgeGateError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = DeleteFeatureRuleUseCase {
        repo: state.rule_repo(),
    };
    usecase.execute(&feature_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /api/age-verification/admin/overrides/{user_id}/{feature_key} ───────

#[derive(Deserialize)]
pub struct OverrideRequest {
    pub override_type: String,
    pub reason: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub consent_reference: Option<String>,
}

#[derive(Serialize)]
pub struct OverrideResponse {
    pub success: bool,
    pub user_id: Uuid,
    pub feature_key: String,
    pub override_type: String,
    pub reason: Option<String>,
    #[serde(serialize_with = "companion_core::serde::to_rfc3339_ms_opt")]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub granted_by: Option<Uuid>,
    pub consent_reference: Option<String>,
}

pub async fn upsert_override(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((user_id, feature_key)): Path<(Uuid, String)>,
    body: Result<Json<OverrideRequest>, JsonRejection>,
) -> Result<Json<OverrideResponse>, AgeGateError> {
    require_role(&identity, UserRole::Support)?;
    let body = json_body(
        body,
        AgeGateError::InvalidOverride("request body must be a valid JSON object"),
    )?;
    let usecase = UpsertOverrideUseCase {
        repo: state.override_repo(),
        now: Utc::now(),
    };
    let saved = usecase
        .execute(UpsertOverrideInput {
            user_id,
            feature_key,
            override_type: body.override_type,
            reason: body.reason,
            expires_at: body.expires_at,
            consent_reference: body.consent_reference,
            granted_by: identity.user_id,
        })
        .await?;
    Ok(Json(OverrideResponse {
        success: true,
        user_id: saved.user_id,
        feature_key: saved.feature_key,
        override_type: saved.override_type.to_string(),
        reason: saved.reason,
        expires_at: saved.expires_at,
        granted_by: saved.granted_by,
        consent_reference: saved.consent_reference,
    }))
}

// ── DELETE /api/age-verification/admin/overrides/{user_id}/{feature_key} ────

pub async fn revoke_override(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((user_id, feature_key)): Path<(Uuid, String)>,
) -> Result<StatusCode, AgeGateError> {
    require_role(&identity, UserRole::Support)?;
    let usecase = RevokeOverrideUseCase {
        repo: state.override_repo(),
    };
    usecase.execute(user_id, &feature_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /api/age-verification/admin/persona-behaviors/{persona_id} ──────────

#[derive(Deserialize)]
pub struct PersonaBehaviorRequest {
    pub teen_tone: Option<String>,
    pub teen_system_prompt: Option<String>,
    #[serde(default)]
    pub teen_forbidden_topics: Vec<String>,
    pub adult_tone: Option<String>,
    pub adult_system_prompt: Option<String>,
    #[serde(default)]
    pub allow_romantic: bool,
    #[serde(default)]
    pub allow_flirty: bool,
    #[serde(default)]
    pub allow_intimacy: bool,
    #[serde(default)]
    pub wellness_focus_only: bool,
}

#[derive(Serialize)]
pub struct PersonaBehaviorSavedResponse {
    pub success: bool,
    pub persona_id: String,
}

pub async fn upsert_persona_behavior(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(persona_id): Path<String>,
    body: Result<Json<PersonaBehaviorRequest>, JsonRejection>,
) -> Result<Json<PersonaBehaviorSavedResponse>, AgeGateError> {
    require_role(&identity, UserRole::Admin)?;
    let body = json_body(
        body,
        AgeGateError::InvalidPersonaBehavior("request body must be a valid JSON object"),
    )?;
    let usecase = UpsertPersonaBehaviorUseCase {
        repo: state.persona_repo(),
    };
    let saved = usecase
        .execute(PersonaBehavior {
            persona_id,
            teen_tone: body.teen_tone,
            teen_system_prompt: body.teen_system_prompt,
            teen_forbidden_topics: body.teen_forbidden_topics,
            adult_tone: body.adult_tone,
            adult_system_prompt: body.adult_system_prompt,
            allow_romantic: body.allow_romantic,
            allow_flirty: body.allow_flirty,
            allow_intimacy: body.allow_intimacy,
            wellness_focus_only: body.wellness_focus_only,
        })
        .await?;
    Ok(Json(PersonaBehaviorSavedResponse {
        success: true,
        persona_id: saved.persona_id,
    }))
}
