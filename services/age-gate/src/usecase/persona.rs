use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::persona::{ResolvedBehavior, behavior_for};
use crate::domain::repository::{AgeVerificationRepository, PersonaBehaviorRepository};
use crate::error::AgeGateError;
use crate::usecase::verification::current_profile;

// ── GetPersonaBehavior ───────────────────────────────────────────────────────

pub struct GetPersonaBehaviorUseCase<V, P>
where
    V: AgeVerificationRepository,
    P: PersonaBehaviorRepository,
{
    pub verifications: V,
    pub personas: P,
    pub now: DateTime<Utc>,
}

impl<V, P> GetPersonaBehaviorUseCase<V, P>
where
    V: AgeVerificationRepository,
    P: PersonaBehaviorRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        persona_id: &str,
    ) -> Result<ResolvedBehavior, AgeGateError> {
        let Some(profile) =
            current_profile(&self.verifications, user_id, self.now.date_naive()).await?
        else {
            return Ok(ResolvedBehavior::safe_default());
        };
        let stored = self.personas.find(persona_id).await?;
        Ok(behavior_for(Some(&profile), stored.as_ref()))
    }
}
