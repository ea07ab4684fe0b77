use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use companion_domain::age::{AgeProfile, classify};

use crate::domain::repository::AgeVerificationRepository;
use crate::domain::types::{AgeVerification, MAX_PLAUSIBLE_AGE, SELF_REPORTED};
use crate::error::AgeGateError;

/// Current profile for `user_id`, re-derived from the stored date of birth.
/// `None` means the user has not verified.
pub(crate) async fn current_profile<R: AgeVerificationRepository>(
    repo: &R,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<Option<AgeProfile>, AgeGateError> {
    match repo.find_by_user(user_id).await? {
        Some(verification) => Ok(Some(verification.profile_on(today)?)),
        None => Ok(None),
    }
}

// ── VerifyAge ────────────────────────────────────────────────────────────────

pub struct VerifyAgeInput {
    pub date_of_birth: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

pub struct VerifyAgeUseCase<R: AgeVerificationRepository> {
    pub repo: R,
    pub now: DateTime<Utc>,
}

impl<R: AgeVerificationRepository> VerifyAgeUseCase<R> {
    /// Classify a self-reported date of birth and store the result.
    ///
    /// Minors are rejected without writing anything.
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: VerifyAgeInput,
    ) -> Result<AgeVerification, AgeGateError> {
        let raw = input
            .date_of_birth
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AgeGateError::MissingDateOfBirth)?;
        let date_of_birth = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AgeGateError::InvalidDateOfBirth)?;
        let profile = classify(date_of_birth, self.now.date_naive())?;
        if profile.age > MAX_PLAUSIBLE_AGE {
            return Err(AgeGateError::InvalidDateOfBirth);
        }
        if profile.tier.is_minor() {
            info!(%user_id, "age verification blocked: under minimum age");
            return Err(AgeGateError::minor());
        }

        let verification = AgeVerification {
            user_id,
            date_of_birth,
            age: profile.age,
            age_tier: profile.tier,
            verified_at: self.now,
            verification_method: SELF_REPORTED.to_owned(),
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            created_at: self.now,
            updated_at: self.now,
        };
        self.repo.upsert(&verification).await?;
        info!(%user_id, tier = %profile.tier, "age verified");
        Ok(verification)
    }
}

// ── GetVerificationStatus ────────────────────────────────────────────────────

pub struct GetVerificationStatusUseCase<R: AgeVerificationRepository> {
    pub repo: R,
    pub now: DateTime<Utc>,
}

impl<R: AgeVerificationRepository> GetVerificationStatusUseCase<R> {
    /// The user's verification with age and tier as of today, or `None` if unverified.
    pub async fn execute(&self, user_id: Uuid) -> Result<Option<AgeVerification>, AgeGateError> {
        let Some(mut verification) = self.repo.find_by_user(user_id).await? else {
            return Ok(None);
        };
        let profile = verification.profile_on(self.now.date_naive())?;
        if verification.is_stale(&profile) {
            self.repo.refresh_profile(user_id, &profile, self.now).await?;
            verification.age = profile.age;
            verification.age_tier = profile.tier;
            verification.updated_at = self.now;
        }
        Ok(Some(verification))
    }
}
