use chrono::Utc;
use uuid::Uuid;

use companion_age_gate::error::AgeGateError;
use companion_age_gate::usecase::access::CheckFeatureAccessUseCase;
use companion_age_gate::usecase::verification::{
    GetVerificationStatusUseCase, VerifyAgeInput, VerifyAgeUseCase,
};
use companion_domain::age::AgeTier;

use crate::helpers::{
    MemoryOverrideRepo, MemoryRuleRepo, MemoryVerificationRepo, born_years_ago, catalog,
};

fn input(date_of_birth: String) -> VerifyAgeInput {
    VerifyAgeInput {
        date_of_birth: Some(date_of_birth),
        ip_address: Some("203.0.113.7".into()),
        user_agent: Some("integration-test".into()),
    }
}

#[tokio::test]
async fn should_keep_single_record_when_verifying_twice() {
    let repo = MemoryVerificationRepo::default();
    let user_id = Uuid::now_v7();
    let dob = born_years_ago(20, 40);

    for _ in 0..2 {
        let uc = VerifyAgeUseCase {
            repo: repo.clone(),
            now: Utc::now(),
        };
        let verification = uc.execute(user_id, input(dob.clone())).await.unwrap();
        assert_eq!(verification.age_tier, AgeTier::Adult);
    }

    let rows = repo.rows.lock().unwrap();
    assert_eq!(rows.len(), 1, "re-verification must replace, not append");
    assert_eq!(rows[0].age, 20);
}

#[tokio::test]
async fn should_block_ten_year_old_and_store_nothing() {
    let repo = MemoryVerificationRepo::default();
    let uc = VerifyAgeUseCase {
        repo: repo.clone(),
        now: Utc::now(),
    };

    let result = uc.execute(Uuid::now_v7(), input(born_years_ago(10, 0))).await;

    assert!(
        matches!(result, Err(AgeGateError::AgeBlocked { min_age_required: 16 })),
        "expected AgeBlocked, got {result:?}"
    );
    assert!(repo.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_gate_features_for_new_teen() {
    let verifications = MemoryVerificationRepo::default();
    let user_id = Uuid::now_v7();

    let verification = VerifyAgeUseCase {
        repo: verifications.clone(),
        now: Utc::now(),
    }
    .execute(user_id, input(born_years_ago(16, 1)))
    .await
    .unwrap();
    assert_eq!(verification.age, 16);
    assert_eq!(verification.age_tier, AgeTier::Teen);

    let check = CheckFeatureAccessUseCase {
        verifications: verifications.clone(),
        rules: MemoryRuleRepo::new(catalog()),
        overrides: MemoryOverrideRepo::default(),
        now: Utc::now(),
    };

    let intimacy = check.execute(user_id, "intimacy_mode").await.unwrap();
    assert!(!intimacy.accessible);
    assert!(intimacy.reason.contains("18+"), "reason was {:?}", intimacy.reason);

    let cbt = check.execute(user_id, "cbt_games").await.unwrap();
    assert!(cbt.accessible);
}

#[tokio::test]
async fn should_report_status_after_verification() {
    let repo = MemoryVerificationRepo::default();
    let user_id = Uuid::now_v7();

    let status = GetVerificationStatusUseCase {
        repo: repo.clone(),
        now: Utc::now(),
    };
    assert!(status.execute(user_id).await.unwrap().is_none());

    VerifyAgeUseCase {
        repo: repo.clone(),
        now: Utc::now(),
    }
    .execute(user_id, input(born_years_ago(17, 3)))
    .await
    .unwrap();

    let verification = status.execute(user_id).await.unwrap().unwrap();
    assert_eq!(verification.age, 17);
    assert_eq!(verification.ip_address.as_deref(), Some("203.0.113.7"));
    assert_eq!(verification.user_agent.as_deref(), Some("integration-test"));
}
