use sea_orm::entity::prelude::*;

/// Self-reported date of birth and the age tier last derived from it. One row per user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "age_verifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub date_of_birth: Date,
    pub age: i16,
    /// `"minor"`, `"teen"` or `"adult"`.
    pub age_tier: String,
    pub verified_at: chrono::DateTime<chrono::Utc>,
    pub verification_method: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
