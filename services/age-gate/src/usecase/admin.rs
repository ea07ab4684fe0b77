use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::{
    FeatureRuleRepository, OverrideRepository, PersonaBehaviorRepository,
};
use crate::domain::types::{AccessOverride, FeatureRule, OverrideType, PersonaBehavior, is_valid_key};
use crate::error::AgeGateError;

// ── UpsertFeatureRule ────────────────────────────────────────────────────────

pub struct UpsertFeatureRuleUseCase<F: FeatureRuleRepository> {
    pub repo: F,
}

impl<F: FeatureRuleRepository> UpsertFeatureRuleUseCase<F> {
    pub async fn execute(&self, rule: FeatureRule) -> Result<FeatureRule, AgeGateError> {
        rule.validate().map_err(AgeGateError::InvalidFeatureRule)?;
        self.repo.upsert(&rule).await?;
        info!(feature_key = %rule.feature_key, "feature rule saved");
        Ok(rule)
    }
}

// ── DeleteFeatureRule ────────────────────────────────────────────────────────

pub struct DeleteFeatureRuleUseCase<F: FeatureRuleRepository> {
    pub repo: F,
}

impl<F: FeatureRuleRepository> DeleteFeatureRuleUseCase<F> {
    pub async fn execute(&self, feature_key: &str) -> Result<(), AgeGateError> {
        if !self.repo.delete(feature_key).await? {
            return Err(AgeGateError::FeatureRuleNotFound);
        }
        info!(%feature_key, "feature rule deleted");
        Ok(())
    }
}

// ── UpsertOverride ───────────────────────────────────────────────────────────

pub struct UpsertOverrideInput {
    pub user_id: Uuid,
    pub feature_key: String,
    pub override_type: String,
    pub reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub consent_reference: Option<String>,
    pub granted_by: Uuid,
}

pub struct UpsertOverrideUseCase<O: OverrideRepository> {
    pub repo: O,
    pub now: DateTime<Utc>,
}

impl<O: OverrideRepository> UpsertOverrideUseCase<O> {
    /// Issue or replace the override for `(user_id, feature_key)`.
    pub async fn execute(&self, input: UpsertOverrideInput) -> Result<AccessOverride, AgeGateError> {
        if !is_valid_key(&input.feature_key) {
            return Err(AgeGateError::InvalidOverride(
                "feature_key must be 1-64 characters of [a-z0-9_]",
            ));
        }
        let override_type = input
            .override_type
            .parse::<OverrideType>()
            .map_err(|()| AgeGateError::InvalidOverride("override_type must be grant or deny"))?;
        if input.expires_at.is_some_and(|expires_at| expires_at <= self.now) {
            return Err(AgeGateError::InvalidOverride("expires_at must be in the future"));
        }

        let access_override = AccessOverride {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            feature_key: input.feature_key,
            override_type,
            reason: input.reason.filter(|r| !r.trim().is_empty()),
            expires_at: input.expires_at,
            granted_by: Some(input.granted_by),
            consent_reference: input.consent_reference,
            created_at: self.now,
        };
        self.repo.upsert(&access_override).await?;
        info!(
            user_id = %access_override.user_id,
            feature_key = %access_override.feature_key,
            override_type = %access_override.override_type,
            granted_by = %input.granted_by,
            "access override saved"
        );
        Ok(access_override)
    }
}

// ── RevokeOverride ───────────────────────────────────────────────────────────

pub struct RevokeOverrideUseCase<O: OverrideRepository> {
    pub repo: O,
}

impl<O: OverrideRepository> RevokeOverrideUseCase<O> {
    pub async fn execute(&self, user_id: Uuid, feature_key: &str) -> Result<(), AgeGateError> {
        if !self.repo.delete(user_id, feature_key).await? {
            return Err(AgeGateError::OverrideNotFound);
        }
        info!(%user_id, %feature_key, "access override revoked");
        Ok(())
    }
}

// ── UpsertPersonaBehavior ────────────────────────────────────────────────────

pub struct UpsertPersonaBehaviorUseCase<P: PersonaBehaviorRepository> {
    pub repo: P,
}

impl<P: PersonaBehaviorRepository> UpsertPersonaBehaviorUseCase<P> {
    pub async fn execute(&self, behavior: PersonaBehavior) -> Result<PersonaBehavior, AgeGateError> {
        behavior
            .validate()
            .map_err(AgeGateError::InvalidPersonaBehavior)?;
        self.repo.upsert(&behavior).await?;
        info!(persona_id = %behavior.persona_id, "persona behavior saved");
        Ok(behavior)
    }
}
