use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::Value;
use uuid::Uuid;

use companion_age_gate::infra::cache::ReferenceCache;
use companion_age_gate::router::build_router;
use companion_age_gate::state::AppState;
use companion_age_gate_schema::{age_access_overrides, age_verifications, feature_access_rules};
use companion_testing::auth::MockAuth;

use crate::helpers::born_years_ago;

fn server(db: DatabaseConnection) -> TestServer {
    TestServer::new(build_router(AppState {
        db: Arc::new(db),
        reference_cache: ReferenceCache::new(64, Duration::from_secs(60)),
    }))
    .unwrap()
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn with_auth(mut request: TestRequest, auth: &MockAuth) -> TestRequest {
    for (name, value) in auth.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

fn verification_row(user_id: Uuid, date_of_birth: NaiveDate, age: i16, tier: &str) -> age_verifications::Model {
    let now = Utc::now();
    age_verifications::Model {
        user_id,
        date_of_birth,
        age,
        age_tier: tier.to_owned(),
        verified_at: now,
        verification_method: "self_reported".to_owned(),
        ip_address: None,
        user_agent: None,
        created_at: now,
        updated_at: now,
    }
}

fn dob(years: u32, extra_days: u64) -> NaiveDate {
    NaiveDate::parse_from_str(&born_years_ago(years, extra_days), "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn should_answer_health_checks() {
    let server = server(empty_db());
    server.get("/healthz").await.assert_status(StatusCode::OK);
    server.get("/readyz").await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let server = server(DatabaseConnection::Disconnected);
    server.get("/healthz").await.assert_status(StatusCode::OK);
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_reject_request_without_identity() {
    let response = server(empty_db()).get("/api/age-verification/status").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_report_unverified_status() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<age_verifications::Model>::new()])
        .into_connection();
    let auth = MockAuth::member();
    let server = server(db);

    let response = with_auth(server.get("/api/age-verification/status"), &auth).await;

    response.assert_status(StatusCode::OK);
    let json = response.json::<Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["verified"], false);
    assert_eq!(json["requires_verification"], true);
}

#[tokio::test]
async fn should_report_refreshed_tier_for_stale_row() {
    let auth = MockAuth::member();
    let row = verification_row(auth.user_id, dob(18, 2), 17, "teen");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let server = server(db);

    let response = with_auth(server.get("/api/age-verification/status"), &auth).await;

    response.assert_status(StatusCode::OK);
    let json = response.json::<Value>();
    assert_eq!(json["verified"], true);
    assert_eq!(json["age"], 18);
    assert_eq!(json["age_tier"], "adult");
    assert_eq!(json["is_adult"], true);
    assert_eq!(json["date_of_birth"], dob(18, 2).format("%Y-%m-%d").to_string());
}

#[tokio::test]
async fn should_block_minor_with_minimum_age() {
    let auth = MockAuth::member();
    let server = server(empty_db());

    let response = with_auth(server.post("/api/age-verification/verify"), &auth)
        .json(&serde_json::json!({ "date_of_birth": born_years_ago(10, 0) }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let json = response.json::<Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "AGE_BLOCKED");
    assert_eq!(json["min_age_required"], 16);
}

#[tokio::test]
async fn should_reject_malformed_future_and_missing_dates() {
    let auth = MockAuth::member();
    let tomorrow = (Utc::now().date_naive() + chrono::Days::new(1))
        .format("%Y-%m-%d")
        .to_string();
    let cases = [
        (serde_json::json!({ "date_of_birth": "19-10-2008" }), "INVALID_DATE_OF_BIRTH"),
        (serde_json::json!({ "date_of_birth": tomorrow }), "FUTURE_DATE_OF_BIRTH"),
        (serde_json::json!({}), "MISSING_DATE_OF_BIRTH"),
    ];
    let server = server(empty_db());

    for (body, kind) in cases {
        let response = with_auth(server.post("/api/age-verification/verify"), &auth)
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["kind"], kind);
    }
}

#[tokio::test]
async fn should_reject_unreadable_verify_bodies() {
    let auth = MockAuth::member();
    let server = server(empty_db());

    let wrong_type = with_auth(server.post("/api/age-verification/verify"), &auth)
        .json(&serde_json::json!({ "date_of_birth": 20100101 }))
        .await;
    wrong_type.assert_status(StatusCode::BAD_REQUEST);
    let json = wrong_type.json::<Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "INVALID_DATE_OF_BIRTH");

    let not_json = with_auth(server.post("/api/age-verification/verify"), &auth)
        .text("not json")
        .await;
    not_json.assert_status(StatusCode::BAD_REQUEST);
    let json = not_json.json::<Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "INVALID_DATE_OF_BIRTH");
}

#[tokio::test]
async fn should_reject_implausible_date_of_birth() {
    let auth = MockAuth::member();
    let server = server(empty_db());

    let response = with_auth(server.post("/api/age-verification/verify"), &auth)
        .json(&serde_json::json!({ "date_of_birth": "-100000-01-01" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_DATE_OF_BIRTH");
}

#[tokio::test]
async fn should_verify_teen() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let auth = MockAuth::member();
    let server = server(db);

    let response = with_auth(server.post("/api/age-verification/verify"), &auth)
        .add_header(
            axum::http::HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        )
        .json(&serde_json::json!({ "date_of_birth": born_years_ago(16, 1) }))
        .await;

    response.assert_status(StatusCode::OK);
    let json = response.json::<Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["age"], 16);
    assert_eq!(json["age_tier"], "teen");
    assert_eq!(json["is_teen"], true);
    assert_eq!(json["is_minor"], false);
    assert!(json["verified_at"].is_string());
}

#[tokio::test]
async fn should_block_adult_feature_for_teen() {
    let auth = MockAuth::member();
    let now = Utc::now();
    let rule = feature_access_rules::Model {
        feature_key: "intimacy_mode".to_owned(),
        feature_name: "Intimacy Mode".to_owned(),
        description: None,
        min_age_required: 18,
        teen_accessible: false,
        adult_only: true,
        is_active: true,
        compliance_note: None,
        created_at: now,
        updated_at: now,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![verification_row(auth.user_id, dob(16, 30), 16, "teen")]])
        .append_query_results([vec![rule]])
        .append_query_results([Vec::<age_access_overrides::Model>::new()])
        .into_connection();
    let server = server(db);

    let response = with_auth(
        server.get("/api/age-verification/feature-access/intimacy_mode"),
        &auth,
    )
    .await;

    response.assert_status(StatusCode::OK);
    let json = response.json::<Value>();
    assert_eq!(json["feature_key"], "intimacy_mode");
    assert_eq!(json["accessible"], false);
    assert_eq!(json["min_age_required"], 18);
    assert!(json["reason"].as_str().unwrap().contains("18+"));
}

#[tokio::test]
async fn should_forbid_member_from_admin_routes() {
    let auth = MockAuth::member();
    let server = server(empty_db());

    let response = with_auth(
        server.put("/api/age-verification/admin/feature-rules/voice_chat"),
        &auth,
    )
    .json(&serde_json::json!({ "feature_name": "Voice Chat", "min_age_required": 16 }))
    .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_reject_adult_only_rule_below_eighteen_from_admin() {
    let auth = MockAuth::admin();
    let server = server(empty_db());

    let response = with_auth(
        server.put("/api/age-verification/admin/feature-rules/flirty_chat"),
        &auth,
    )
    .json(&serde_json::json!({
        "feature_name": "Flirty Chat",
        "min_age_required": 16,
        "adult_only": true,
    }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_FEATURE_RULE");
}

#[tokio::test]
async fn should_reject_out_of_range_minimum_age_from_admin() {
    let auth = MockAuth::admin();
    let server = server(empty_db());

    let response = with_auth(
        server.put("/api/age-verification/admin/feature-rules/voice_chat"),
        &auth,
    )
    .json(&serde_json::json!({ "feature_name": "Voice Chat", "min_age_required": 70000 }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_FEATURE_RULE");
}

#[tokio::test]
async fn should_reject_unreadable_admin_bodies() {
    let auth = MockAuth::admin();
    let server = server(empty_db());
    let cases = [
        (
            server.put("/api/age-verification/admin/feature-rules/voice_chat"),
            "INVALID_FEATURE_RULE",
        ),
        (
            server.put(&format!(
                "/api/age-verification/admin/overrides/{}/voice_chat",
                Uuid::new_v4()
            )),
            "INVALID_OVERRIDE",
        ),
        (
            server.put("/api/age-verification/admin/persona-behaviors/luna"),
            "INVALID_PERSONA_BEHAVIOR",
        ),
    ];

    let wrong_types = serde_json::json!({
        "min_age_required": "sixteen",
        "override_type": 1,
        "allow_flirty": "yes",
    });

    for (request, kind) in cases {
        let response = with_auth(request, &auth).json(&wrong_types).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<Value>();
        assert_eq!(json["success"], false);
        assert_eq!(json["kind"], kind);
    }
}

#[tokio::test]
async fn should_report_missing_override_on_revoke() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let support = MockAuth::new(Uuid::new_v4(), 1);
    let server = server(db);

    let response = with_auth(
        server.delete(&format!(
            "/api/age-verification/admin/overrides/{}/voice_chat",
            Uuid::new_v4()
        )),
        &support,
    )
    .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "OVERRIDE_NOT_FOUND");
}
