use chrono::Utc;
use uuid::Uuid;

use companion_age_gate::error::AgeGateError;
use companion_age_gate::usecase::access::CheckFeatureAccessUseCase;
use companion_age_gate::usecase::admin::{
    DeleteFeatureRuleUseCase, UpsertFeatureRuleUseCase, UpsertPersonaBehaviorUseCase,
};
use companion_age_gate::usecase::persona::GetPersonaBehaviorUseCase;
use companion_age_gate::usecase::verification::{VerifyAgeInput, VerifyAgeUseCase};

use crate::helpers::{
    MemoryOverrideRepo, MemoryPersonaRepo, MemoryRuleRepo, MemoryVerificationRepo,
    born_years_ago, catalog, permissive_persona, rule,
};

async fn verify(repo: &MemoryVerificationRepo, years: u32) -> Uuid {
    let user_id = Uuid::now_v7();
    VerifyAgeUseCase {
        repo: repo.clone(),
        now: Utc::now(),
    }
    .execute(
        user_id,
        VerifyAgeInput {
            date_of_birth: Some(born_years_ago(years, 20)),
            ip_address: None,
            user_agent: None,
        },
    )
    .await
    .unwrap();
    user_id
}

#[tokio::test]
async fn should_gate_previously_unknown_feature_once_rule_exists() {
    let verifications = MemoryVerificationRepo::default();
    let rules = MemoryRuleRepo::new(catalog());
    let teen = verify(&verifications, 16).await;

    let check = CheckFeatureAccessUseCase {
        verifications,
        rules: rules.clone(),
        overrides: MemoryOverrideRepo::default(),
        now: Utc::now(),
    };
    assert!(check.execute(teen, "companion_photos").await.unwrap().accessible);

    UpsertFeatureRuleUseCase {
        repo: rules.clone(),
    }
    .execute(rule("companion_photos", 18, false, true))
    .await
    .unwrap();
    assert!(!check.execute(teen, "companion_photos").await.unwrap().accessible);

    DeleteFeatureRuleUseCase {
        repo: rules.clone(),
    }
    .execute("companion_photos")
    .await
    .unwrap();
    assert!(check.execute(teen, "companion_photos").await.unwrap().accessible);
}

#[tokio::test]
async fn should_reject_inconsistent_rule_without_storing() {
    let rules = MemoryRuleRepo::new(catalog());
    let result = UpsertFeatureRuleUseCase {
        repo: rules.clone(),
    }
    .execute(rule("intimacy_mode", 16, true, true))
    .await;

    assert!(
        matches!(result, Err(AgeGateError::InvalidFeatureRule(_))),
        "expected InvalidFeatureRule, got {result:?}"
    );
    let stored = rules.rules.lock().unwrap();
    let intimacy = stored.iter().find(|r| r.feature_key == "intimacy_mode").unwrap();
    assert_eq!(intimacy.min_age_required, 18);
}

#[tokio::test]
async fn should_apply_updated_persona_behavior() {
    let verifications = MemoryVerificationRepo::default();
    let personas = MemoryPersonaRepo::new(vec![permissive_persona("kai")]);
    let adult = verify(&verifications, 30).await;

    let mut updated = permissive_persona("kai");
    updated.allow_intimacy = false;
    updated.adult_tone = Some("calm".into());
    UpsertPersonaBehaviorUseCase {
        repo: personas.clone(),
    }
    .execute(updated)
    .await
    .unwrap();

    let behavior = GetPersonaBehaviorUseCase {
        verifications,
        personas,
        now: Utc::now(),
    }
    .execute(adult, "kai")
    .await
    .unwrap();
    assert_eq!(behavior.tone, "calm");
    assert!(!behavior.allow_intimacy);
}
