use sea_orm_migration::prelude::*;

mod m20260901_000001_create_age_verifications;
mod m20260901_000002_create_feature_access_rules;
mod m20260901_000003_create_age_access_overrides;
mod m20260901_000004_create_persona_behaviors;
mod m20260901_000005_seed_reference_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_age_verifications::Migration),
            Box::new(m20260901_000002_create_feature_access_rules::Migration),
            Box::new(m20260901_000003_create_age_access_overrides::Migration),
            Box::new(m20260901_000004_create_persona_behaviors::Migration),
            Box::new(m20260901_000005_seed_reference_data::Migration),
        ]
    }
}
