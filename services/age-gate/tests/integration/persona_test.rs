use chrono::Utc;
use uuid::Uuid;

use companion_age_gate::domain::persona::ResolvedBehavior;
use companion_age_gate::usecase::persona::GetPersonaBehaviorUseCase;
use companion_age_gate::usecase::verification::{VerifyAgeInput, VerifyAgeUseCase};

use crate::helpers::{MemoryPersonaRepo, MemoryVerificationRepo, born_years_ago, permissive_persona};

async fn verify(repo: &MemoryVerificationRepo, years: u32) -> Uuid {
    let user_id = Uuid::now_v7();
    VerifyAgeUseCase {
        repo: repo.clone(),
        now: Utc::now(),
    }
    .execute(
        user_id,
        VerifyAgeInput {
            date_of_birth: Some(born_years_ago(years, 5)),
            ip_address: None,
            user_agent: None,
        },
    )
    .await
    .unwrap();
    user_id
}

#[tokio::test]
async fn should_never_allow_romance_for_teen_on_any_persona() {
    let verifications = MemoryVerificationRepo::default();
    let teen = verify(&verifications, 17).await;
    let personas = ["luna", "kai", "sage", "nova"];

    let uc = GetPersonaBehaviorUseCase {
        verifications,
        personas: MemoryPersonaRepo::new(personas.iter().map(|p| permissive_persona(p)).collect()),
        now: Utc::now(),
    };

    for persona_id in personas.iter().chain(["unseeded"].iter()) {
        let behavior = uc.execute(teen, persona_id).await.unwrap();
        assert!(
            !behavior.allow_romantic && !behavior.allow_flirty && !behavior.allow_intimacy,
            "{persona_id} leaked romantic capability to a teen"
        );
    }
}

#[tokio::test]
async fn should_give_adult_the_stored_persona() {
    let verifications = MemoryVerificationRepo::default();
    let adult = verify(&verifications, 25).await;

    let uc = GetPersonaBehaviorUseCase {
        verifications,
        personas: MemoryPersonaRepo::new(vec![permissive_persona("nova")]),
        now: Utc::now(),
    };
    let behavior = uc.execute(adult, "nova").await.unwrap();

    assert_eq!(behavior.tone, "playful");
    assert_eq!(behavior.system_prompt, "You are nova.");
    assert!(behavior.allow_romantic && behavior.allow_intimacy);
    assert!(behavior.forbidden_topics.is_empty());
}

#[tokio::test]
async fn should_give_unverified_user_the_safe_default() {
    let uc = GetPersonaBehaviorUseCase {
        verifications: MemoryVerificationRepo::default(),
        personas: MemoryPersonaRepo::new(vec![permissive_persona("luna")]),
        now: Utc::now(),
    };
    let behavior = uc.execute(Uuid::now_v7(), "luna").await.unwrap();
    assert_eq!(behavior, ResolvedBehavior::safe_default());
}
