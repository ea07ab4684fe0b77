#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use companion_domain::age::AgeProfile;
use uuid::Uuid;

use crate::domain::types::{AccessOverride, AgeVerification, FeatureRule, PersonaBehavior};
use crate::error::AgeGateError;

/// Repository for per-user age verifications.
pub trait AgeVerificationRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AgeVerification>, AgeGateError>;

    /// Insert or replace the user's verification in a single statement.
    async fn upsert(&self, verification: &AgeVerification) -> Result<(), AgeGateError>;

    /// Persist a re-derived age/tier without touching the verification itself.
    /// `now` becomes the row's `updated_at`.
    async fn refresh_profile(
        &self,
        user_id: Uuid,
        profile: &AgeProfile,
        now: DateTime<Utc>,
    ) -> Result<(), AgeGateError>;
}

/// Repository for feature access rules (reference data).
pub trait FeatureRuleRepository: Send + Sync {
    async fn find(&self, feature_key: &str) -> Result<Option<FeatureRule>, AgeGateError>;

    /// Active rules ordered by feature key.
    async fn list_active(&self) -> Result<Vec<FeatureRule>, AgeGateError>;

    async fn upsert(&self, rule: &FeatureRule) -> Result<(), AgeGateError>;

    /// Delete a rule. Returns `true` if a row was deleted.
    async fn delete(&self, feature_key: &str) -> Result<bool, AgeGateError>;
}

/// Repository for per-user access overrides. Expired rows are returned too.
pub trait OverrideRepository: Send + Sync {
    async fn find(
        &self,
        user_id: Uuid,
        feature_key: &str,
    ) -> Result<Option<AccessOverride>, AgeGateError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AccessOverride>, AgeGateError>;

    /// Insert or replace the override for `(user_id, feature_key)`.
    async fn upsert(&self, access_override: &AccessOverride) -> Result<(), AgeGateError>;

    /// Delete an override. Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, feature_key: &str) -> Result<bool, AgeGateError>;
}

/// Repository for persona behaviors (reference data).
pub trait PersonaBehaviorRepository: Send + Sync {
    async fn find(&self, persona_id: &str) -> Result<Option<PersonaBehavior>, AgeGateError>;

    async fn upsert(&self, behavior: &PersonaBehavior) -> Result<(), AgeGateError>;
}
