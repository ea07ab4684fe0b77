//! Feature access resolution.
//!
//! Evaluation order, first match wins:
//! verification → override → unknown feature → inactive rule → minimum age →
//! adult-only → teen eligibility → allowed.

use chrono::{DateTime, Utc};

use companion_domain::age::{ADULT_AGE, AgeProfile, AgeTier};

use crate::domain::types::{AccessOverride, FeatureRule, OverrideType};

pub const REASON_VERIFICATION_REQUIRED: &str = "Age verification required";
pub const REASON_UNDERAGE: &str = "Users under 16 cannot access this product";
pub const REASON_OVERRIDE_GRANTED: &str = "Access granted by override";
pub const REASON_OVERRIDE_DENIED: &str = "Access denied by override";
pub const REASON_UNRESTRICTED: &str = "No age restriction configured for this feature";
pub const REASON_INACTIVE: &str = "This feature is currently unavailable";
pub const REASON_ADULT_ONLY: &str = "This feature is restricted to users 18+";
pub const REASON_NOT_FOR_TEENS: &str = "This feature is not available for users under 18";
pub const REASON_ALLOWED: &str = "Access granted";

/// Which step of the evaluation produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Verification,
    Override,
    Default,
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub accessible: bool,
    pub reason: String,
    pub min_age_required: Option<u32>,
    pub source: DecisionSource,
}

impl AccessDecision {
    fn allow(reason: impl Into<String>, source: DecisionSource, rule: Option<&FeatureRule>) -> Self {
        Self {
            accessible: true,
            reason: reason.into(),
            min_age_required: rule.map(|r| r.min_age_required),
            source,
        }
    }

    fn block(reason: impl Into<String>, source: DecisionSource, rule: Option<&FeatureRule>) -> Self {
        Self {
            accessible: false,
            reason: reason.into(),
            min_age_required: rule.map(|r| r.min_age_required),
            source,
        }
    }
}

/// Decide whether a feature is accessible.
///
/// `profile` must be freshly derived from the stored date of birth. `access_override`
/// is the stored override for this user and feature, if any; expiry is checked here
/// against `now`. A missing `rule` means the feature is unrestricted.
pub fn resolve(
    profile: Option<&AgeProfile>,
    rule: Option<&FeatureRule>,
    access_override: Option<&AccessOverride>,
    now: DateTime<Utc>,
) -> AccessDecision {
    let Some(profile) = profile else {
        return AccessDecision::block(REASON_VERIFICATION_REQUIRED, DecisionSource::Verification, rule);
    };
    if profile.tier == AgeTier::Minor {
        return AccessDecision::block(REASON_UNDERAGE, DecisionSource::Verification, rule);
    }

    if let Some(o) = access_override.filter(|o| o.is_active(now)) {
        return match o.override_type {
            OverrideType::Grant => {
                AccessDecision::allow(REASON_OVERRIDE_GRANTED, DecisionSource::Override, rule)
            }
            OverrideType::Deny => AccessDecision::block(
                o.reason.as_deref().unwrap_or(REASON_OVERRIDE_DENIED),
                DecisionSource::Override,
                rule,
            ),
        };
    }

    // Unknown features fail open.
    let Some(rule) = rule else {
        return AccessDecision::allow(REASON_UNRESTRICTED, DecisionSource::Default, None);
    };

    if !rule.is_active {
        return AccessDecision::block(REASON_INACTIVE, DecisionSource::Rule, Some(rule));
    }
    if profile.age < rule.min_age_required {
        return AccessDecision::block(
            format!("This feature requires age {}+", rule.min_age_required),
            DecisionSource::Rule,
            Some(rule),
        );
    }
    if rule.adult_only && profile.age < ADULT_AGE {
        return AccessDecision::block(REASON_ADULT_ONLY, DecisionSource::Rule, Some(rule));
    }
    if profile.tier == AgeTier::Teen && !rule.teen_accessible {
        return AccessDecision::block(REASON_NOT_FOR_TEENS, DecisionSource::Rule, Some(rule));
    }
    AccessDecision::allow(REASON_ALLOWED, DecisionSource::Rule, Some(rule))
}

/// Whole years until `age` reaches the rule's minimum; zero once it has.
pub fn years_until_access(rule: &FeatureRule, age: u32) -> u32 {
    rule.min_age_required.saturating_sub(age)
}
