//! Read-through cache for reference data.
//!
//! Feature rules and persona behaviors change rarely and are read on every
//! access check, so lookups are served from memory. Negative lookups are
//! cached too. Admin writes through the cached repositories invalidate the
//! affected entries; the TTL bounds staleness across instances.

use std::time::Duration;

use moka::sync::Cache;

use crate::domain::repository::{FeatureRuleRepository, PersonaBehaviorRepository};
use crate::domain::types::{FeatureRule, PersonaBehavior};
use crate::error::AgeGateError;

/// Shared in-memory caches. Clones share the same storage.
#[derive(Clone)]
pub struct ReferenceCache {
    rules: Cache<String, Option<FeatureRule>>,
    active_rules: Cache<(), Vec<FeatureRule>>,
    personas: Cache<String, Option<PersonaBehavior>>,
}

impl ReferenceCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            rules: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            active_rules: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            personas: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    fn invalidate_rule(&self, feature_key: &str) {
        self.rules.invalidate(feature_key);
        self.active_rules.invalidate(&());
    }
}

// ── Feature rules ───────────────────────────────────────────────────────────

pub struct CachedFeatureRuleRepository<R: FeatureRuleRepository> {
    pub inner: R,
    pub cache: ReferenceCache,
}

impl<R: FeatureRuleRepository> FeatureRuleRepository for CachedFeatureRuleRepository<R> {
    async fn find(&self, feature_key: &str) -> Result<Option<FeatureRule>, AgeGateError> {
        if let Some(hit) = self.cache.rules.get(feature_key) {
            return Ok(hit);
        }
        let rule = self.inner.find(feature_key).await?;
        self.cache.rules.insert(feature_key.to_owned(), rule.clone());
        Ok(rule)
    }

    async fn list_active(&self) -> Result<Vec<FeatureRule>, AgeGateError> {
        if let Some(hit) = self.cache.active_rules.get(&()) {
            return Ok(hit);
        }
        let rules = self.inner.list_active().await?;
        self.cache.active_rules.insert((), rules.clone());
        Ok(rules)
    }

    async fn upsert(&self, rule: &FeatureRule) -> Result<(), AgeGateError> {
        self.inner.upsert(rule).await?;
        self.cache.invalidate_rule(&rule.feature_key);
        Ok(())
    }

    async fn delete(&self, feature_key: &str) -> Result<bool, AgeGateError> {
        let deleted = self.inner.delete(feature_key).await?;
        self.cache.invalidate_rule(feature_key);
        Ok(deleted)
    }
}

// ── Persona behaviors ───────────────────────────────────────────────────────

pub struct CachedPersonaBehaviorRepository<R: PersonaBehaviorRepository> {
    pub inner: R,
    pub cache: ReferenceCache,
}

impl<R: PersonaBehaviorRepository> PersonaBehaviorRepository
    for CachedPersonaBehaviorRepository<R>
{
    async fn find(&self, persona_id: &str) -> Result<Option<PersonaBehavior>, AgeGateError> {
        if let Some(hit) = self.cache.personas.get(persona_id) {
            return Ok(hit);
        }
        let behavior = self.inner.find(persona_id).await?;
        self.cache
            .personas
            .insert(persona_id.to_owned(), behavior.clone());
        Ok(behavior)
    }

    async fn upsert(&self, behavior: &PersonaBehavior) -> Result<(), AgeGateError> {
        self.inner.upsert(behavior).await?;
        self.cache.personas.invalidate(behavior.persona_id.as_str());
        Ok(())
    }
}
