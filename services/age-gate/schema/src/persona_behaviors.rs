use sea_orm::entity::prelude::*;

/// Tier-specific conversational profile for a persona.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "persona_behaviors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub persona_id: String,
    pub teen_tone: Option<String>,
    pub teen_system_prompt: Option<String>,
    /// JSON array of topic strings.
    pub teen_forbidden_topics: Json,
    pub adult_tone: Option<String>,
    pub adult_system_prompt: Option<String>,
    pub allow_romantic: bool,
    pub allow_flirty: bool,
    pub allow_intimacy: bool,
    pub wellness_focus_only: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
