//! Persona behavior selection by age tier.

use companion_domain::age::{AgeProfile, AgeTier};

use crate::domain::types::PersonaBehavior;

pub const SUPPORTIVE_TONE: &str = "supportive";
pub const CONVERSATIONAL_TONE: &str = "conversational";

pub const SAFE_DEFAULT_PROMPT: &str = "You are a kind, supportive companion. Keep every conversation \
friendly and age-appropriate, focus on the user's wellbeing, and suggest trusted people or crisis \
resources when they are struggling.";

pub const TEEN_DEFAULT_PROMPT: &str = "You are a supportive wellness companion for a teenager. Keep \
conversations age-appropriate and focused on wellbeing, study and healthy habits. Never engage in \
romantic, flirtatious or intimate roleplay.";

pub const ADULT_DEFAULT_PROMPT: &str =
    "You are a warm, engaging companion. Be attentive, curious and emotionally present.";

/// Behavior applied to a persona for a specific user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBehavior {
    pub tone: String,
    pub system_prompt: String,
    pub allow_romantic: bool,
    pub allow_flirty: bool,
    pub allow_intimacy: bool,
    pub wellness_only: bool,
    pub forbidden_topics: Vec<String>,
}

impl ResolvedBehavior {
    fn wellness(tone: String, system_prompt: String, wellness_only: bool, forbidden_topics: Vec<String>) -> Self {
        Self {
            tone,
            system_prompt,
            allow_romantic: false,
            allow_flirty: false,
            allow_intimacy: false,
            wellness_only,
            forbidden_topics,
        }
    }

    /// Applied when nothing is known about the user's age.
    pub fn safe_default() -> Self {
        Self::wellness(SUPPORTIVE_TONE.to_owned(), SAFE_DEFAULT_PROMPT.to_owned(), true, Vec::new())
    }
}

/// Select the behavior for a user with the given profile.
///
/// Teens never get romantic, flirty or intimacy capabilities, whatever the stored row says.
pub fn behavior_for(profile: Option<&AgeProfile>, stored: Option<&PersonaBehavior>) -> ResolvedBehavior {
    let Some(profile) = profile else {
        return ResolvedBehavior::safe_default();
    };
    match (profile.tier, stored) {
        (AgeTier::Minor, _) => ResolvedBehavior::safe_default(),
        (AgeTier::Teen, None) => ResolvedBehavior::wellness(
            SUPPORTIVE_TONE.to_owned(),
            TEEN_DEFAULT_PROMPT.to_owned(),
            true,
            Vec::new(),
        ),
        (AgeTier::Teen, Some(b)) => ResolvedBehavior::wellness(
            b.teen_tone.clone().unwrap_or_else(|| SUPPORTIVE_TONE.to_owned()),
            b.teen_system_prompt
                .clone()
                .unwrap_or_else(|| TEEN_DEFAULT_PROMPT.to_owned()),
            b.wellness_focus_only,
            b.teen_forbidden_topics.clone(),
        ),
        (AgeTier::Adult, None) => ResolvedBehavior {
            tone: CONVERSATIONAL_TONE.to_owned(),
            system_prompt: ADULT_DEFAULT_PROMPT.to_owned(),
            allow_romantic: true,
            allow_flirty: true,
            allow_intimacy: true,
            wellness_only: false,
            forbidden_topics: Vec::new(),
        },
        (AgeTier::Adult, Some(b)) => ResolvedBehavior {
            tone: b
                .adult_tone
                .clone()
                .unwrap_or_else(|| CONVERSATIONAL_TONE.to_owned()),
            system_prompt: b.adult_system_prompt.clone().unwrap_or_default(),
            allow_romantic: b.allow_romantic,
            allow_flirty: b.allow_flirty,
            allow_intimacy: b.allow_intimacy,
            wellness_only: b.wellness_focus_only,
            forbidden_topics: Vec::new(),
        },
    }
}
