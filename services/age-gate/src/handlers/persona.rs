use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Serialize;

use companion_auth_types::identity::IdentityHeaders;

use crate::error::AgeGateError;
use crate::state::AppState;
use crate::usecase::persona::GetPersonaBehaviorUseCase;

// ── GET /api/age-verification/persona-behavior/{persona_id} ─────────────────

#[derive(Serialize)]
pub struct PersonaBehaviorResponse {
    pub success: bool,
    pub persona_id: String,
    pub tone: String,
    pub system_prompt: String,
    pub allow_romantic: bool,
    pub allow_flirty: bool,
    pub allow_intimacy: bool,
    pub wellness_only: bool,
    pub forbidden_topics: Vec<String>,
}

pub async fn get_persona_behavior(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(persona_id): Path<String>,
) -> Result<Json<PersonaBehaviorResponse>, AgeGateError> {
    let usecase = GetPersonaBehaviorUseCase {
        verifications: state.verification_repo(),
        personas: state.persona_repo(),
        now: Utc::now(),
    };
    let behavior = usecase.execute(identity.user_id, &persona_id).await?;
    Ok(Json(PersonaBehaviorResponse {
        success: true,
        persona_id,
        tone: behavior.tone,
        system_prompt: behavior.system_prompt,
        allow_romantic: behavior.allow_romantic,
        allow_flirty: behavior.allow_flirty,
        allow_intimacy: behavior.allow_intimacy,
        wellness_only: behavior.wellness_only,
        forbidden_topics: behavior.forbidden_topics,
    }))
}
