use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use companion_auth_types::identity::IdentityHeaders;
use companion_domain::age::AgeTier;

use crate::error::AgeGateError;
use crate::handlers::json_body;
use crate::state::AppState;
use crate::usecase::verification::{
    GetVerificationStatusUseCase, VerifyAgeInput, VerifyAgeUseCase,
};

/// Originating client address: first hop of `x-forwarded-for`, else `x-real-ip`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    forwarded.or_else(real_ip).map(str::to_owned)
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

// ── POST /api/age-verification/verify ────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyAgeRequest {
    pub date_of_birth: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyAgeResponse {
    pub success: bool,
    pub age: u32,
    pub age_tier: AgeTier,
    pub is_teen: bool,
    pub is_adult: bool,
    pub is_minor: bool,
    #[serde(serialize_with = "companion_core::serde::to_rfc3339_ms")]
    pub verified_at: chrono::DateTime<chrono::Utc>,
}

pub async fn verify_age(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<VerifyAgeRequest>, JsonRejection>,
) -> Result<Json<VerifyAgeResponse>, AgeGateError> {
    let body = json_body(body, AgeGateError::InvalidDateOfBirth)?;
    let usecase = VerifyAgeUseCase {
        repo: state.verification_repo(),
        now: Utc::now(),
    };
    let verification = usecase
        .execute(
            identity.user_id,
            VerifyAgeInput {
                date_of_birth: body.date_of_birth,
                ip_address: client_ip(&headers),
                user_agent: user_agent(&headers),
            },
        )
        .await?;
    let tier = verification.age_tier;
    Ok(Json(VerifyAgeResponse {
        success: true,
        age: verification.age,
        age_tier: tier,
        is_teen: tier.is_teen(),
        is_adult: tier.is_adult(),
        is_minor: tier.is_minor(),
        verified_at: verification.verified_at,
    }))
}

// ── GET /api/age-verification/status ─────────────────────────────────────────

#[derive(Serialize)]
#[serde(untagged)]
pub enum VerificationStatusResponse {
    Unverified {
        success: bool,
        verified: bool,
        requires_verification: bool,
    },
    Verified {
        success: bool,
        verified: bool,
        age: u32,
        age_tier: AgeTier,
        is_teen: bool,
        is_adult: bool,
        is_minor: bool,
        date_of_birth: chrono::NaiveDate,
        #[serde(serialize_with = "companion_core::serde::to_rfc3339_ms")]
        verified_at: chrono::DateTime<chrono::Utc>,
    },
}

pub async fn get_status(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<VerificationStatusResponse>, AgeGateError> {
    let usecase = GetVerificationStatusUseCase {
        repo: state.verification_repo(),
        now: Utc::now(),
    };
    let response = match usecase.execute(identity.user_id).await? {
        None => VerificationStatusResponse::Unverified {
            success: true,
            verified: false,
            requires_verification: true,
        },
        Some(verification) => {
            let tier = verification.age_tier;
            VerificationStatusResponse::Verified {
                success: true,
                verified: true,
                age: verification.age,
                age_tier: tier,
                is_teen: tier.is_teen(),
                is_adult: tier.is_adult(),
                is_minor: tier.is_minor(),
                date_of_birth: verification.date_of_birth,
                verified_at: verification.verified_at,
            }
        }
    };
    Ok(Json(response))
}
