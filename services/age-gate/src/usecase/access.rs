use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::access::{AccessDecision, REASON_VERIFICATION_REQUIRED, resolve, years_until_access};
use crate::domain::repository::{
    AgeVerificationRepository, FeatureRuleRepository, OverrideRepository,
};
use crate::domain::types::OverrideType;
use crate::error::AgeGateError;
use crate::usecase::verification::current_profile;

// ── CheckFeatureAccess ───────────────────────────────────────────────────────

pub struct CheckFeatureAccessUseCase<V, F, O>
where
    V: AgeVerificationRepository,
    F: FeatureRuleRepository,
    O: OverrideRepository,
{
    pub verifications: V,
    pub rules: F,
    pub overrides: O,
    pub now: DateTime<Utc>,
}

impl<V, F, O> CheckFeatureAccessUseCase<V, F, O>
where
    V: AgeVerificationRepository,
    F: FeatureRuleRepository,
    O: OverrideRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        feature_key: &str,
    ) -> Result<AccessDecision, AgeGateError> {
        let profile = current_profile(&self.verifications, user_id, self.now.date_naive()).await?;
        let rule = self.rules.find(feature_key).await?;
        let access_override = match profile {
            Some(_) => self.overrides.find(user_id, feature_key).await?,
            None => None,
        };
        Ok(resolve(
            profile.as_ref(),
            rule.as_ref(),
            access_override.as_ref(),
            self.now,
        ))
    }
}

// ── ListAccessibleFeatures ───────────────────────────────────────────────────

pub struct ListAccessibleFeaturesUseCase<V, F, O>
where
    V: AgeVerificationRepository,
    F: FeatureRuleRepository,
    O: OverrideRepository,
{
    pub verifications: V,
    pub rules: F,
    pub overrides: O,
    pub now: DateTime<Utc>,
}

impl<V, F, O> ListAccessibleFeaturesUseCase<V, F, O>
where
    V: AgeVerificationRepository,
    F: FeatureRuleRepository,
    O: OverrideRepository,
{
    /// Accessible feature keys, sorted and de-duplicated. Empty for unverified users.
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<String>, AgeGateError> {
        let Some(profile) =
            current_profile(&self.verifications, user_id, self.now.date_naive()).await?
        else {
            return Ok(Vec::new());
        };
        let rules = self.rules.list_active().await?;
        let overrides = self.overrides.list_by_user(user_id).await?;
        let by_key: HashMap<&str, _> = overrides
            .iter()
            .map(|o| (o.feature_key.as_str(), o))
            .collect();

        let mut features = BTreeSet::new();
        for rule in &rules {
            let access_override = by_key.get(rule.feature_key.as_str()).copied();
            if resolve(Some(&profile), Some(rule), access_override, self.now).accessible {
                features.insert(rule.feature_key.clone());
            }
        }

        let evaluated: BTreeSet<&str> = rules.iter().map(|r| r.feature_key.as_str()).collect();
        for o in &overrides {
            if o.override_type == OverrideType::Grant
                && o.is_active(self.now)
                && !evaluated.contains(o.feature_key.as_str())
            {
                features.insert(o.feature_key.clone());
            }
        }
        Ok(features.into_iter().collect())
    }
}

// ── ListRestrictedFeatures ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictedFeature {
    pub feature_key: String,
    pub feature_name: String,
    pub min_age_required: u32,
    pub reason: String,
    /// `None` when the user has not verified.
    pub years_until_access: Option<u32>,
}

pub struct ListRestrictedFeaturesUseCase<V, F, O>
where
    V: AgeVerificationRepository,
    F: FeatureRuleRepository,
    O: OverrideRepository,
{
    pub verifications: V,
    pub rules: F,
    pub overrides: O,
    pub now: DateTime<Utc>,
}

impl<V, F, O> ListRestrictedFeaturesUseCase<V, F, O>
where
    V: AgeVerificationRepository,
    F: FeatureRuleRepository,
    O: OverrideRepository,
{
    /// Active rules the user is blocked from, in feature key order.
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<RestrictedFeature>, AgeGateError> {
        let profile = current_profile(&self.verifications, user_id, self.now.date_naive()).await?;
        let rules = self.rules.list_active().await?;

        let Some(profile) = profile else {
            return Ok(rules
                .into_iter()
                .map(|rule| RestrictedFeature {
                    reason: rule
                        .compliance_note
                        .unwrap_or_else(|| REASON_VERIFICATION_REQUIRED.to_owned()),
                    feature_key: rule.feature_key,
                    feature_name: rule.feature_name,
                    min_age_required: rule.min_age_required,
                    years_until_access: None,
                })
                .collect());
        };

        let overrides = self.overrides.list_by_user(user_id).await?;
        let by_key: HashMap<&str, _> = overrides
            .iter()
            .map(|o| (o.feature_key.as_str(), o))
            .collect();

        let mut restricted = Vec::new();
        for rule in rules {
            let access_override = by_key.get(rule.feature_key.as_str()).copied();
            let decision = resolve(Some(&profile), Some(&rule), access_override, self.now);
            if decision.accessible {
                continue;
            }
            restricted.push(RestrictedFeature {
                years_until_access: Some(years_until_access(&rule, profile.age)),
                reason: rule.compliance_note.unwrap_or(decision.reason),
                feature_key: rule.feature_key,
                feature_name: rule.feature_name,
                min_age_required: rule.min_age_required,
            });
        }
        Ok(restricted)
    }
}
