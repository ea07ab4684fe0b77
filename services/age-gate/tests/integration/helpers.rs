use std::sync::{Arc, Mutex};

use chrono::{DateTime, Months, NaiveDate, Utc};
use uuid::Uuid;

use companion_age_gate::domain::repository::{
    AgeVerificationRepository, FeatureRuleRepository, OverrideRepository,
    PersonaBehaviorRepository,
};
use companion_age_gate::domain::types::{
    AccessOverride, AgeVerification, FeatureRule, PersonaBehavior,
};
use companion_age_gate::error::AgeGateError;
use companion_domain::age::AgeProfile;

// ── MemoryVerificationRepo ───────────────────────────────────────────────────

/// Clones share storage, so one handle can be inspected after a usecase consumes another.
#[derive(Clone, Default)]
pub struct MemoryVerificationRepo {
    pub rows: Arc<Mutex<Vec<AgeVerification>>>,
}

impl AgeVerificationRepository for MemoryVerificationRepo {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AgeVerification>, AgeGateError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.user_id == user_id)
            .cloned())
    }

    async fn upsert(&self, verification: &AgeVerification) -> Result<(), AgeGateError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|v| v.user_id == verification.user_id) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = verification.clone();
                existing.created_at = created_at;
            }
            None => rows.push(verification.clone()),
        }
        Ok(())
    }

    async fn refresh_profile(
        &self,
        user_id: Uuid,
        profile: &AgeProfile,
        now: DateTime<Utc>,
    ) -> Result<(), AgeGateError> {
        if let Some(row) = self
            .rows
            .lock()
            .unwrap()
            .iter_mut()
            .find(|v| v.user_id == user_id)
        {
            row.age = profile.age;
            row.age_tier = profile.tier;
            row.updated_at = now;
        }
        Ok(())
    }
}

// ── MemoryRuleRepo ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryRuleRepo {
    pub rules: Arc<Mutex<Vec<FeatureRule>>>,
}

impl MemoryRuleRepo {
    pub fn new(rules: Vec<FeatureRule>) -> Self {
        Self {
            rules: Arc::new(Mutex::new(rules)),
        }
    }
}

impl FeatureRuleRepository for MemoryRuleRepo {
    async fn find(&self, feature_key: &str) -> Result<Option<FeatureRule>, AgeGateError> {
        Ok(self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.feature_key == feature_key)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<FeatureRule>, AgeGateError> {
        let mut active: Vec<FeatureRule> = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.feature_key.cmp(&b.feature_key));
        Ok(active)
    }

    async fn upsert(&self, rule: &FeatureRule) -> Result<(), AgeGateError> {
        let mut rules = self.rules.lock().unwrap();
        rules.retain(|r| r.feature_key != rule.feature_key);
        rules.push(rule.clone());
        Ok(())
    }

    async fn delete(&self, feature_key: &str) -> Result<bool, AgeGateError> {
        let mut rules = self.rules.lock().unwrap();
        let before = rules.len();
        rules.retain(|r| r.feature_key != feature_key);
        Ok(rules.len() != before)
    }
}

// ── MemoryOverrideRepo ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryOverrideRepo {
    pub overrides: Arc<Mutex<Vec<AccessOverride>>>,
}

impl OverrideRepository for MemoryOverrideRepo {
    async fn find(
        &self,
        user_id: Uuid,
        feature_key: &str,
    ) -> Result<Option<AccessOverride>, AgeGateError> {
        Ok(self
            .overrides
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.user_id == user_id && o.feature_key == feature_key)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AccessOverride>, AgeGateError> {
        Ok(self
            .overrides
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, access_override: &AccessOverride) -> Result<(), AgeGateError> {
        let mut overrides = self.overrides.lock().unwrap();
        overrides.retain(|o| {
            !(o.user_id == access_override.user_id && o.feature_key == access_override.feature_key)
        });
        overrides.push(access_override.clone());
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, feature_key: &str) -> Result<bool, AgeGateError> {
        let mut overrides = self.overrides.lock().unwrap();
        let before = overrides.len();
        overrides.retain(|o| !(o.user_id == user_id && o.feature_key == feature_key));
        Ok(overrides.len() != before)
    }
}

// ── MemoryPersonaRepo ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryPersonaRepo {
    pub personas: Arc<Mutex<Vec<PersonaBehavior>>>,
}

impl MemoryPersonaRepo {
    pub fn new(personas: Vec<PersonaBehavior>) -> Self {
        Self {
            personas: Arc::new(Mutex::new(personas)),
        }
    }
}

impl PersonaBehaviorRepository for MemoryPersonaRepo {
    async fn find(&self, persona_id: &str) -> Result<Option<PersonaBehavior>, AgeGateError> {
        Ok(self
            .personas
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.persona_id == persona_id)
            .cloned())
    }

    async fn upsert(&self, behavior: &PersonaBehavior) -> Result<(), AgeGateError> {
        let mut personas = self.personas.lock().unwrap();
        personas.retain(|p| p.persona_id != behavior.persona_id);
        personas.push(behavior.clone());
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn rule(key: &str, min_age_required: u32, teen_accessible: bool, adult_only: bool) -> FeatureRule {
    FeatureRule {
        feature_key: key.to_owned(),
        feature_name: key.replace('_', " "),
        description: None,
        min_age_required,
        teen_accessible,
        adult_only,
        is_active: true,
        compliance_note: None,
    }
}

/// A subset of the seeded catalog covering each rule shape.
pub fn catalog() -> Vec<FeatureRule> {
    vec![
        rule("cbt_games", 16, true, false),
        rule("mood_journal", 16, true, false),
        rule("crisis_resources", 16, true, false),
        rule("voice_chat", 16, false, false),
        rule("romantic_roleplay", 18, false, true),
        rule("flirty_chat", 18, false, true),
        rule("intimacy_mode", 18, false, true),
    ]
}

pub fn permissive_persona(persona_id: &str) -> PersonaBehavior {
    PersonaBehavior {
        persona_id: persona_id.to_owned(),
        teen_tone: Some("gentle".into()),
        teen_system_prompt: None,
        teen_forbidden_topics: vec!["romance".into(), "dating".into()],
        adult_tone: Some("playful".into()),
        adult_system_prompt: Some(format!("You are {persona_id}.")),
        allow_romantic: true,
        allow_flirty: true,
        allow_intimacy: true,
        wellness_focus_only: false,
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Date of birth that makes a user exactly `years` old plus `extra_days` today.
pub fn born_years_ago(years: u32, extra_days: u64) -> String {
    let dob = today()
        .checked_sub_months(Months::new(years * 12))
        .and_then(|d| d.checked_sub_days(chrono::Days::new(extra_days)))
        .unwrap();
    dob.format("%Y-%m-%d").to_string()
}
