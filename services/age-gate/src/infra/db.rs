use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use companion_age_gate_schema::{
    age_access_overrides, age_verifications, feature_access_rules, persona_behaviors,
};
use companion_domain::age::{AgeProfile, AgeTier};

use crate::domain::repository::{
    AgeVerificationRepository, FeatureRuleRepository, OverrideRepository,
    PersonaBehaviorRepository,
};
use crate::domain::types::{
    AccessOverride, AgeVerification, FeatureRule, OverrideType, PersonaBehavior,
};
use crate::error::AgeGateError;

/// `SMALLINT` columns hold ages; values outside `i16` are refused, never wrapped.
fn to_small_int(value: u32, column: &'static str) -> Result<i16, AgeGateError> {
    Ok(i16::try_from(value).with_context(|| format!("{column} {value} out of range"))?)
}

fn from_small_int(value: i16, column: &'static str) -> Result<u32, AgeGateError> {
    Ok(u32::try_from(value).with_context(|| format!("stored {column} {value} is negative"))?)
}

// ── Age verification repository ─────────────────────────────────────────────

pub struct DbAgeVerificationRepository {
    pub db: Arc<DatabaseConnection>,
}

impl AgeVerificationRepository for DbAgeVerificationRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AgeVerification>, AgeGateError> {
        let model = age_verifications::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .context("find age verification")?;
        model.map(age_verification_from_model).transpose()
    }

    async fn upsert(&self, verification: &AgeVerification) -> Result<(), AgeGateError> {
        let row = age_verifications::ActiveModel {
            user_id: Set(verification.user_id),
            date_of_birth: Set(verification.date_of_birth),
            age: Set(to_small_int(verification.age, "age")?),
            age_tier: Set(verification.age_tier.as_str().to_owned()),
            verified_at: Set(verification.verified_at),
            verification_method: Set(verification.verification_method.clone()),
            ip_address: Set(verification.ip_address.clone()),
            user_agent: Set(verification.user_agent.clone()),
            created_at: Set(verification.created_at),
            updated_at: Set(verification.updated_at),
        };
        age_verifications::Entity::insert(row)
            .on_conflict(
                OnConflict::column(age_verifications::Column::UserId)
                    .update_columns([
                        age_verifications::Column::DateOfBirth,
                        age_verifications::Column::Age,
                        age_verifications::Column::AgeTier,
                        age_verifications::Column::VerifiedAt,
                        age_verifications::Column::VerificationMethod,
                        age_verifications::Column::IpAddress,
                        age_verifications::Column::UserAgent,
                        age_verifications::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .context("upsert age verification")?;
        Ok(())
    }

    async fn refresh_profile(
        &self,
        user_id: Uuid,
        profile: &AgeProfile,
        now: DateTime<Utc>,
    ) -> Result<(), AgeGateError> {
        let age = to_small_int(profile.age, "age")?;
        age_verifications::Entity::update_many()
            .filter(age_verifications::Column::UserId.eq(user_id))
            .col_expr(age_verifications::Column::Age, Expr::value(age))
            .col_expr(
                age_verifications::Column::AgeTier,
                Expr::value(profile.tier.as_str()),
            )
            .col_expr(age_verifications::Column::UpdatedAt, Expr::value(now))
            .exec(self.db.as_ref())
            .await
            .context("refresh age profile")?;
        Ok(())
    }
}

fn age_verification_from_model(
    model: age_verifications::Model,
) -> Result<AgeVerification, AgeGateError> {
    let age_tier = model
        .age_tier
        .parse::<AgeTier>()
        .context("decode stored age tier")?;
    Ok(AgeVerification {
        user_id: model.user_id,
        date_of_birth: model.date_of_birth,
        age: from_small_int(model.age, "age")?,
        age_tier,
        verified_at: model.verified_at,
        verification_method: model.verification_method,
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Feature rule repository ─────────────────────────────────────────────────

pub struct DbFeatureRuleRepository {
    pub db: Arc<DatabaseConnection>,
}

impl FeatureRuleRepository for DbFeatureRuleRepository {
    async fn find(&self, feature_key: &str) -> Result<Option<FeatureRule>, AgeGateError> {
        let model = feature_access_rules::Entity::find_by_id(feature_key.to_owned())
            .one(self.db.as_ref())
            .await
            .context("find feature rule")?;
        model.map(feature_rule_from_model).transpose()
    }

    async fn list_active(&self) -> Result<Vec<FeatureRule>, AgeGateError> {
        let models = feature_access_rules::Entity::find()
            .filter(feature_access_rules::Column::IsActive.eq(true))
            .order_by_asc(feature_access_rules::Column::FeatureKey)
            .all(self.db.as_ref())
            .await
            .context("list active feature rules")?;
        models.into_iter().map(feature_rule_from_model).collect()
    }

    async fn upsert(&self, rule: &FeatureRule) -> Result<(), AgeGateError> {
        let now = Utc::now();
        let row = feature_access_rules::ActiveModel {
            feature_key: Set(rule.feature_key.clone()),
            feature_name: Set(rule.feature_name.clone()),
            description: Set(rule.description.clone()),
            min_age_required: Set(to_small_int(rule.min_age_required, "min_age_required")?),
            teen_accessible: Set(rule.teen_accessible),
            adult_only: Set(rule.adult_only),
            is_active: Set(rule.is_active),
            compliance_note: Set(rule.compliance_note.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        feature_access_rules::Entity::insert(row)
            .on_conflict(
                OnConflict::column(feature_access_rules::Column::FeatureKey)
                    .update_columns([
                        feature_access_rules::Column::FeatureName,
                        feature_access_rules::Column::Description,
                        feature_access_rules::Column::MinAgeRequired,
                        feature_access_rules::Column::TeenAccessible,
                        feature_access_rules::Column::AdultOnly,
                        feature_access_rules::Column::IsActive,
                        feature_access_rules::Column::ComplianceNote,
                        feature_access_rules::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .context("upsert feature rule")?;
        Ok(())
    }

    async fn delete(&self, feature_key: &str) -> Result<bool, AgeGateError> {
        let result = feature_access_rules::Entity::delete_by_id(feature_key.to_owned())
            .exec(self.db.as_ref())
            .await
            .context("delete feature rule")?;
        Ok(result.rows_affected > 0)
    }
}

fn feature_rule_from_model(
    model: feature_access_rules::Model,
) -> Result<FeatureRule, AgeGateError> {
    Ok(FeatureRule {
        feature_key: model.feature_key,
        feature_name: model.feature_name,
        description: model.description,
        min_age_required: from_small_int(model.min_age_required, "min_age_required")?,
        teen_accessible: model.teen_accessible,
        adult_only: model.adult_only,
        is_active: model.is_active,
        compliance_note: model.compliance_note,
    })
}

// ── Override repository ─────────────────────────────────────────────────────

pub struct DbOverrideRepository {
    pub db: Arc<DatabaseConnection>,
}

impl OverrideRepository for DbOverrideRepository {
    async fn find(
        &self,
        user_id: Uuid,
        feature_key: &str,
    ) -> Result<Option<AccessOverride>, AgeGateError> {
        let model = age_access_overrides::Entity::find()
            .filter(age_access_overrides::Column::UserId.eq(user_id))
            .filter(age_access_overrides::Column::FeatureKey.eq(feature_key))
            .one(self.db.as_ref())
            .await
            .context("find access override")?;
        model.map(access_override_from_model).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AccessOverride>, AgeGateError> {
        let models = age_access_overrides::Entity::find()
            .filter(age_access_overrides::Column::UserId.eq(user_id))
            .order_by_asc(age_access_overrides::Column::FeatureKey)
            .all(self.db.as_ref())
            .await
            .context("list access overrides")?;
        models.into_iter().map(access_override_from_model).collect()
    }

    async fn upsert(&self, access_override: &AccessOverride) -> Result<(), AgeGateError> {
        let row = age_access_overrides::ActiveModel {
            id: Set(access_override.id),
            user_id: Set(access_override.user_id),
            feature_key: Set(access_override.feature_key.clone()),
            override_type: Set(access_override.override_type.as_str().to_owned()),
            reason: Set(access_override.reason.clone()),
            expires_at: Set(access_override.expires_at),
            granted_by: Set(access_override.granted_by),
            consent_reference: Set(access_override.consent_reference.clone()),
            created_at: Set(access_override.created_at),
            updated_at: Set(access_override.created_at),
        };
        age_access_overrides::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    age_access_overrides::Column::UserId,
                    age_access_overrides::Column::FeatureKey,
                ])
                .update_columns([
                    age_access_overrides::Column::OverrideType,
                    age_access_overrides::Column::Reason,
                    age_access_overrides::Column::ExpiresAt,
                    age_access_overrides::Column::GrantedBy,
                    age_access_overrides::Column::ConsentReference,
                    age_access_overrides::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .context("upsert access override")?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, feature_key: &str) -> Result<bool, AgeGateError> {
        let result = age_access_overrides::Entity::delete_many()
            .filter(age_access_overrides::Column::UserId.eq(user_id))
            .filter(age_access_overrides::Column::FeatureKey.eq(feature_key))
            .exec(self.db.as_ref())
            .await
            .context("delete access override")?;
        Ok(result.rows_affected > 0)
    }
}

fn access_override_from_model(
    model: age_access_overrides::Model,
) -> Result<AccessOverride, AgeGateError> {
    let override_type = model.override_type.parse::<OverrideType>().map_err(|()| {
        anyhow::anyhow!("unknown override type {:?} in storage", model.override_type)
    })?;
    Ok(AccessOverride {
        id: model.id,
        user_id: model.user_id,
        feature_key: model.feature_key,
        override_type,
        reason: model.reason,
        expires_at: model.expires_at,
        granted_by: model.granted_by,
        consent_reference: model.consent_reference,
        created_at: model.created_at,
    })
}

// ── Persona behavior repository ─────────────────────────────────────────────

pub struct DbPersonaBehaviorRepository {
    pub db: Arc<DatabaseConnection>,
}

impl PersonaBehaviorRepository for DbPersonaBehaviorRepository {
    async fn find(&self, persona_id: &str) -> Result<Option<PersonaBehavior>, AgeGateError> {
        let model = persona_behaviors::Entity::find_by_id(persona_id.to_owned())
            .one(self.db.as_ref())
            .await
            .context("find persona behavior")?;
        model.map(persona_behavior_from_model).transpose()
    }

    async fn upsert(&self, behavior: &PersonaBehavior) -> Result<(), AgeGateError> {
        let now = Utc::now();
        let row = persona_behaviors::ActiveModel {
            persona_id: Set(behavior.persona_id.clone()),
            teen_tone: Set(behavior.teen_tone.clone()),
            teen_system_prompt: Set(behavior.teen_system_prompt.clone()),
            teen_forbidden_topics: Set(serde_json::json!(behavior.teen_forbidden_topics)),
            adult_tone: Set(behavior.adult_tone.clone()),
            adult_system_prompt: Set(behavior.adult_system_prompt.clone()),
            allow_romantic: Set(behavior.allow_romantic),
            allow_flirty: Set(behavior.allow_flirty),
            allow_intimacy: Set(behavior.allow_intimacy),
            wellness_focus_only: Set(behavior.wellness_focus_only),
            created_at: Set(now),
            updated_at: Set(now),
        };
        persona_behaviors::Entity::insert(row)
            .on_conflict(
                OnConflict::column(persona_behaviors::Column::PersonaId)
                    .update_columns([
                        persona_behaviors::Column::TeenTone,
                        persona_behaviors::Column::TeenSystemPrompt,
                        persona_behaviors::Column::TeenForbiddenTopics,
                        persona_behaviors::Column::AdultTone,
                        persona_behaviors::Column::AdultSystemPrompt,
                        persona_behaviors::Column::AllowRomantic,
                        persona_behaviors::Column::AllowFlirty,
                        persona_behaviors::Column::AllowIntimacy,
                        persona_behaviors::Column::WellnessFocusOnly,
                        persona_behaviors::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .context("upsert persona behavior")?;
        Ok(())
    }
}

fn persona_behavior_from_model(
    model: persona_behaviors::Model,
) -> Result<PersonaBehavior, AgeGateError> {
    let teen_forbidden_topics: Vec<String> = serde_json::from_value(model.teen_forbidden_topics)
        .context("decode teen forbidden topics")?;
    Ok(PersonaBehavior {
        persona_id: model.persona_id,
        teen_tone: model.teen_tone,
        teen_system_prompt: model.teen_system_prompt,
        teen_forbidden_topics,
        adult_tone: model.adult_tone,
        adult_system_prompt: model.adult_system_prompt,
        allow_romantic: model.allow_romantic,
        allow_flirty: model.allow_flirty,
        allow_intimacy: model.allow_intimacy,
        wellness_focus_only: model.wellness_focus_only,
    })
}
