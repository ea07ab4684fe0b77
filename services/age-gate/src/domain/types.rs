use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use companion_domain::age::{ADULT_AGE, AgeError, AgeProfile, AgeTier, classify};

/// Verification method recorded for self-reported dates of birth.
pub const SELF_REPORTED: &str = "self_reported";

/// Upper bound on a believable human age. Dates of birth implying more, and
/// rules demanding more, are rejected as input errors.
pub const MAX_PLAUSIBLE_AGE: u32 = 150;

/// A user's stored age verification.
#[derive(Debug, Clone)]
pub struct AgeVerification {
    pub user_id: Uuid,
    pub date_of_birth: NaiveDate,
    pub age: u32,
    pub age_tier: AgeTier,
    pub verified_at: DateTime<Utc>,
    pub verification_method: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgeVerification {
    /// Age and tier as of `today`, derived from the date of birth rather than the stored columns.
    pub fn profile_on(&self, today: NaiveDate) -> Result<AgeProfile, AgeError> {
        classify(self.date_of_birth, today)
    }

    /// Whether the stored age/tier columns disagree with `profile`.
    pub fn is_stale(&self, profile: &AgeProfile) -> bool {
        self.age != profile.age || self.age_tier != profile.tier
    }
}

/// Age policy for a feature key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRule {
    pub feature_key: String,
    pub feature_name: String,
    pub description: Option<String>,
    pub min_age_required: u32,
    pub teen_accessible: bool,
    pub adult_only: bool,
    pub is_active: bool,
    pub compliance_note: Option<String>,
}

impl FeatureRule {
    /// Check the rule's own invariants before it is stored.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !is_valid_key(&self.feature_key) {
            return Err("feature_key must be 1-64 characters of [a-z0-9_]");
        }
        if self.feature_name.trim().is_empty() {
            return Err("feature_name must not be empty");
        }
        if self.adult_only && self.min_age_required < ADULT_AGE {
            return Err("adult_only requires min_age_required >= 18");
        }
        if self.min_age_required > MAX_PLAUSIBLE_AGE {
            return Err("min_age_required must be at most 150");
        }
        Ok(())
    }
}

/// Feature and persona keys: lowercase ASCII, digits and underscore, 1-64 chars.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideType {
    Grant,
    Deny,
}

impl OverrideType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for OverrideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverrideType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grant" => Ok(Self::Grant),
            "deny" => Ok(Self::Deny),
            _ => Err(()),
        }
    }
}

/// Manual grant/deny for one user and feature, taking precedence over the feature's rule.
#[derive(Debug, Clone)]
pub struct AccessOverride {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feature_key: String,
    pub override_type: OverrideType,
    pub reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub granted_by: Option<Uuid>,
    pub consent_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AccessOverride {
    /// Expired overrides stay stored but no longer apply.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Stored tier-specific behavior for a persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaBehavior {
    pub persona_id: String,
    pub teen_tone: Option<String>,
    pub teen_system_prompt: Option<String>,
    pub teen_forbidden_topics: Vec<String>,
    pub adult_tone: Option<String>,
    pub adult_system_prompt: Option<String>,
    pub allow_romantic: bool,
    pub allow_flirty: bool,
    pub allow_intimacy: bool,
    pub wellness_focus_only: bool,
}

impl PersonaBehavior {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !is_valid_key(&self.persona_id) {
            return Err("persona_id must be 1-64 characters of [a-z0-9_]");
        }
        if self.teen_forbidden_topics.iter().any(|t| t.trim().is_empty()) {
            return Err("teen_forbidden_topics must not contain blank entries");
        }
        Ok(())
    }
}
