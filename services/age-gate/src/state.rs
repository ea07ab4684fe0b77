use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::infra::cache::{
    CachedFeatureRuleRepository, CachedPersonaBehaviorRepository, ReferenceCache,
};
use crate::infra::db::{
    DbAgeVerificationRepository, DbFeatureRuleRepository, DbOverrideRepository,
    DbPersonaBehaviorRepository,
};

/// Shared application state passed to every handler via axum `State`.
///
/// `DatabaseConnection` is not `Clone` under sea-orm's `mock` feature, hence the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub reference_cache: ReferenceCache,
}

impl AppState {
    pub fn verification_repo(&self) -> DbAgeVerificationRepository {
        DbAgeVerificationRepository {
            db: self.db.clone(),
        }
    }

    pub fn rule_repo(&self) -> CachedFeatureRuleRepository<DbFeatureRuleRepository> {
        CachedFeatureRuleRepository {
            inner: DbFeatureRuleRepository {
                db: self.db.clone(),
            },
            cache: self.reference_cache.clone(),
        }
    }

    pub fn override_repo(&self) -> DbOverrideRepository {
        DbOverrideRepository {
            db: self.db.clone(),
        }
    }

    pub fn persona_repo(&self) -> CachedPersonaBehaviorRepository<DbPersonaBehaviorRepository> {
        CachedPersonaBehaviorRepository {
            inner: DbPersonaBehaviorRepository {
                db: self.db.clone(),
            },
            cache: self.reference_cache.clone(),
        }
    }
}
