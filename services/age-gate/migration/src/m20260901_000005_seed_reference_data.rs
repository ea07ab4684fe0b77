use chrono::Utc;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};

use companion_age_gate_schema::{feature_access_rules, persona_behaviors};

/// (key, name, description, min age, teen accessible, adult only, compliance note)
type FeatureSeed = (
    &'static str,
    &'static str,
    &'static str,
    i16,
    bool,
    bool,
    Option<&'static str>,
);

const FEATURES: [FeatureSeed; 14] = [
    (
        "cbt_games",
        "CBT Games",
        "Cognitive behavioral therapy mini-games",
        16,
        true,
        false,
        None,
    ),
    (
        "mood_journal",
        "Mood Journal",
        "Daily mood tracking and reflection prompts",
        16,
        true,
        false,
        None,
    ),
    (
        "breathing_exercises",
        "Breathing Exercises",
        "Guided breathing for stress relief",
        16,
        true,
        false,
        None,
    ),
    (
        "guided_meditation",
        "Guided Meditation",
        "Audio-guided meditation sessions",
        16,
        true,
        false,
        None,
    ),
    (
        "wellness_checkins",
        "Wellness Check-ins",
        "Scheduled supportive check-in conversations",
        16,
        true,
        false,
        None,
    ),
    (
        "crisis_resources",
        "Crisis Resources",
        "Hotlines and crisis support directory",
        16,
        true,
        false,
        None,
    ),
    (
        "study_buddy",
        "Study Buddy",
        "Focus sessions and study encouragement",
        16,
        true,
        false,
        None,
    ),
    (
        "voice_chat",
        "Voice Chat",
        "Real-time voice conversations with a persona",
        16,
        false,
        false,
        Some("Voice conversations with teens are held back pending moderation review."),
    ),
    (
        "custom_persona_creation",
        "Custom Persona Creation",
        "Design a persona with a custom personality",
        16,
        false,
        false,
        Some("Custom personas bypass curated teen-safe prompts."),
    ),
    (
        "romantic_roleplay",
        "Romantic Roleplay",
        "Romantic storylines with a companion persona",
        18,
        false,
        true,
        Some("Romantic content is restricted to adults."),
    ),
    (
        "flirty_chat",
        "Flirty Chat",
        "Playful flirtatious conversation style",
        18,
        false,
        true,
        Some("Flirtatious content is restricted to adults."),
    ),
    (
        "intimacy_mode",
        "Intimacy Mode",
        "Emotionally intimate companion conversations",
        18,
        false,
        true,
        Some("Intimate content is restricted to users 18+."),
    ),
    (
        "relationship_mode",
        "Relationship Mode",
        "Ongoing partner-style relationship with a persona",
        18,
        false,
        true,
        Some("Relationship simulation is restricted to adults."),
    ),
    (
        "companion_photos",
        "Companion Photos",
        "Generated photos shared by a persona",
        18,
        false,
        true,
        Some("Generated persona imagery is restricted to adults."),
    ),
];

const TEEN_FORBIDDEN_TOPICS: [&str; 5] = [
    "romance",
    "sexual content",
    "self-harm methods",
    "substance use",
    "dating advice",
];

struct PersonaSeed {
    persona_id: &'static str,
    teen_tone: &'static str,
    teen_system_prompt: &'static str,
    adult_tone: &'static str,
    adult_system_prompt: &'static str,
    allow_romantic: bool,
    allow_flirty: bool,
    allow_intimacy: bool,
    wellness_focus_only: bool,
}

const PERSONAS: [PersonaSeed; 4] = [
    PersonaSeed {
        persona_id: "luna",
        teen_tone: "supportive",
        teen_system_prompt: "You are Luna, a calm and encouraging wellness companion. Keep every conversation age-appropriate, focus on wellbeing, and point to trusted adults or crisis resources when needed.",
        adult_tone: "warm",
        adult_system_prompt: "You are Luna, a warm and affectionate companion who enjoys deep, caring conversations.",
        allow_romantic: true,
        allow_flirty: true,
        allow_intimacy: true,
        wellness_focus_only: false,
    },
    PersonaSeed {
        persona_id: "kai",
        teen_tone: "upbeat",
        teen_system_prompt: "You are Kai, an upbeat study and wellness buddy. Keep conversations friendly, age-appropriate and focused on goals and wellbeing.",
        adult_tone: "playful",
        adult_system_prompt: "You are Kai, a playful and witty companion who keeps conversations light and fun.",
        allow_romantic: true,
        allow_flirty: true,
        allow_intimacy: false,
        wellness_focus_only: false,
    },
    PersonaSeed {
        persona_id: "sage",
        teen_tone: "gentle",
        teen_system_prompt: "You are Sage, a gentle mindfulness guide. Offer breathing exercises, grounding techniques and supportive reflection.",
        adult_tone: "gentle",
        adult_system_prompt: "You are Sage, a gentle mindfulness guide. Offer breathing exercises, grounding techniques and supportive reflection.",
        allow_romantic: false,
        allow_flirty: false,
        allow_intimacy: false,
        wellness_focus_only: true,
    },
    PersonaSeed {
        persona_id: "nova",
        teen_tone: "curious",
        teen_system_prompt: "You are Nova, a curious and encouraging companion. Keep conversations age-appropriate and centered on interests, learning and wellbeing.",
        adult_tone: "conversational",
        adult_system_prompt: "You are Nova, a curious and thoughtful companion who loves exploring ideas together.",
        allow_romantic: true,
        allow_flirty: false,
        allow_intimacy: false,
        wellness_focus_only: false,
    },
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let now = Utc::now();

        let rules = FEATURES.iter().map(
            |&(key, name, description, min_age, teen_accessible, adult_only, note)| {
                feature_access_rules::ActiveModel {
                    feature_key: Set(key.to_owned()),
                    feature_name: Set(name.to_owned()),
                    description: Set(Some(description.to_owned())),
                    min_age_required: Set(min_age),
                    teen_accessible: Set(teen_accessible),
                    adult_only: Set(adult_only),
                    is_active: Set(true),
                    compliance_note: Set(note.map(str::to_owned)),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
            },
        );
        feature_access_rules::Entity::insert_many(rules)
            .on_conflict(
                OnConflict::column(feature_access_rules::Column::FeatureKey)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        let topics = serde_json::json!(TEEN_FORBIDDEN_TOPICS);
        let personas = PERSONAS.iter().map(|p| persona_behaviors::ActiveModel {
            persona_id: Set(p.persona_id.to_owned()),
            teen_tone: Set(Some(p.teen_tone.to_owned())),
            teen_system_prompt: Set(Some(p.teen_system_prompt.to_owned())),
            teen_forbidden_topics: Set(topics.clone()),
            adult_tone: Set(Some(p.adult_tone.to_owned())),
            adult_system_prompt: Set(Some(p.adult_system_prompt.to_owned())),
            allow_romantic: Set(p.allow_romantic),
            allow_flirty: Set(p.allow_flirty),
            allow_intimacy: Set(p.allow_intimacy),
            wellness_focus_only: Set(p.wellness_focus_only),
            created_at: Set(now),
            updated_at: Set(now),
        });
        persona_behaviors::Entity::insert_many(personas)
            .on_conflict(
                OnConflict::column(persona_behaviors::Column::PersonaId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let keys = FEATURES.iter().map(|f| f.0);
        feature_access_rules::Entity::delete_many()
            .filter(feature_access_rules::Column::FeatureKey.is_in(keys))
            .exec(db)
            .await?;
        let ids = PERSONAS.iter().map(|p| p.persona_id);
        persona_behaviors::Entity::delete_many()
            .filter(persona_behaviors::Column::PersonaId.is_in(ids))
            .exec(db)
            .await?;
        Ok(())
    }
}
