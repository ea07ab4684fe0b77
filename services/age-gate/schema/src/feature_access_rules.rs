use sea_orm::entity::prelude::*;

/// Age policy for a gatable product feature.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feature_access_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub feature_key: String,
    pub feature_name: String,
    pub description: Option<String>,
    pub min_age_required: i16,
    pub teen_accessible: bool,
    pub adult_only: bool,
    pub is_active: bool,
    pub compliance_note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
