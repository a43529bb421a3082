//! End-to-end API tests against an in-memory database.
//!
//! Each test builds the full router and drives it with `tower::ServiceExt::
//! oneshot`, exercising the same code path as a real HTTP request.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use recircle_api::config::ApiConfig;
use recircle_api::state::AppState;
use recircle_api::{bootstrap_admin, router};
use recircle_db::{Database, DbConfig};

const ADMIN_ID: &str = "admin";
const ADMIN_PASSWORD: &str = "admin-secret";

async fn test_app_with_state() -> (Router, Arc<AppState>) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let config = ApiConfig {
        http_port: 0,
        database_path: ":memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_access_lifetime_secs: 3600,
        jwt_refresh_lifetime_secs: 86400,
        rate_cache_ttl_secs: 60,
        admin_student_id: Some(ADMIN_ID.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    };
    let state = Arc::new(AppState::new(db, config));
    bootstrap_admin(&state).await.unwrap();
    (router(state.clone()), state)
}

async fn test_app() -> Router {
    test_app_with_state().await.0
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn signup_student(app: &Router, student_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/signup",
        None,
        Some(json!({
            "student_id": student_id,
            "name": "Test Student",
            "email": format!("{student_id}@school.ac.th"),
            "password": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

async fn signin_admin(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/signin",
        None,
        Some(json!({ "student_id": ADMIN_ID, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or("")
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_signup_signin_profile_flow() {
    let app = test_app().await;
    let token = signup_student(&app, "6401234").await;

    let (status, profile) = send(&app, "GET", "/api/v1/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["student_id"], "6401234");
    assert_eq!(profile["points"], 0);

    // Signing in again works with the same credentials
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/signin",
        None,
        Some(json!({ "student_id": "6401234", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["student_id"], "6401234");
}

#[tokio::test]
async fn test_duplicate_student_id_rejected() {
    let app = test_app().await;
    signup_student(&app, "6401234").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/signup",
        None,
        Some(json!({
            "student_id": "6401234",
            "name": "Other Student",
            "email": "other@school.ac.th",
            "password": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "DUPLICATE_STUDENT_ID");
}

#[tokio::test]
async fn test_signup_normalizes_padded_input() {
    let app = test_app().await;

    // Whitespace-padded registration stores the trimmed identity
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/signup",
        None,
        Some(json!({
            "student_id": " 6401234 ",
            "name": "  Test Student  ",
            "email": " 6401234@school.ac.th ",
            "password": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["student_id"], "6401234");
    assert_eq!(body["profile"]["name"], "Test Student");

    // The trimmed ID signs in...
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/signin",
        None,
        Some(json!({ "student_id": "6401234", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // ...and cannot be registered a second time, padded or not
    for id in ["6401234", "  6401234"] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "student_id": id,
                "name": "Shadow Student",
                "email": "shadow@school.ac.th",
                "password": "secret123",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_code(&body), "DUPLICATE_STUDENT_ID");
    }
}

#[tokio::test]
async fn test_duplicate_email_rejected_with_own_code() {
    let app = test_app().await;
    signup_student(&app, "6401234").await;

    // Same email, different student ID
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/signup",
        None,
        Some(json!({
            "student_id": "6409999",
            "name": "Other Student",
            "email": "6401234@school.ac.th",
            "password": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_signin_failures_are_uniform() {
    let app = test_app().await;
    signup_student(&app, "6401234").await;

    let (status_unknown, body_unknown) = send(
        &app,
        "POST",
        "/api/v1/auth/signin",
        None,
        Some(json!({ "student_id": "9999999", "password": "secret123" })),
    )
    .await;
    let (status_wrong_pw, body_wrong_pw) = send(
        &app,
        "POST",
        "/api/v1/auth/signin",
        None,
        Some(json!({ "student_id": "6401234", "password": "wrong" })),
    )
    .await;

    // Unknown ID and wrong password are indistinguishable to the caller
    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(status_wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(body_unknown["error"], body_wrong_pw["error"]);
}

#[tokio::test]
async fn test_routes_require_auth() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/v1/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/v1/rate", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_students() {
    let app = test_app().await;
    let token = signup_student(&app, "6401234").await;

    let (status, _) = send(&app, "GET", "/api/v1/admin/profiles", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/admin/rate",
        Some(&token),
        Some(json!({ "bottles_per_unit": 50, "money_per_unit_satang": 600 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_default_rate_visible() {
    let app = test_app().await;
    let token = signup_student(&app, "6401234").await;

    let (status, rate) = send(&app, "GET", "/api/v1/rate", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rate["bottles_per_unit"], 40);
    assert_eq!(rate["money_per_unit_satang"], 500);
}

#[tokio::test]
async fn test_submit_bottles_credits_points() {
    let app = test_app().await;
    let token = signup_student(&app, "6401234").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&token),
        Some(json!({ "bottles": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points_balance"], 40);
    assert_eq!(body["entry"]["bottles"], 40);
    // 40 bottles at the default rate earns exactly one unit of 5 baht
    assert_eq!(body["entry"]["money_received_satang"], 500);

    let (status, history) =
        send(&app, "GET", "/api/v1/recycle/history", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_rejects_bad_quantities() {
    let app = test_app().await;
    let token = signup_student(&app, "6401234").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&token),
        Some(json!({ "bottles": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_redeem_full_flow() {
    let app = test_app().await;
    let student_token = signup_student(&app, "6401234").await;
    let admin_token = signin_admin(&app).await;

    send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&student_token),
        Some(json!({ "bottles": 100 })),
    )
    .await;

    // Redeem 40 of the 100 points: one unit, 5 baht
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/admin/redeem",
        Some(&admin_token),
        Some(json!({ "student_id": "6401234", "points": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points_balance"], 60);
    assert_eq!(body["record"]["points_redeemed"], 40);
    assert_eq!(body["record"]["money_amount_satang"], 500);

    let (status, history) = send(
        &app,
        "GET",
        "/api/v1/admin/redemptions",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["student_id"], "6401234");
}

#[tokio::test]
async fn test_redeem_below_minimum_unit() {
    let app = test_app().await;
    let student_token = signup_student(&app, "6401234").await;
    let admin_token = signin_admin(&app).await;

    send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&student_token),
        Some(json!({ "bottles": 39 })),
    )
    .await;

    // 39 points at 40 per unit is less than one whole unit
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/admin/redeem",
        Some(&admin_token),
        Some(json!({ "student_id": "6401234", "points": 39 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BELOW_MINIMUM_UNIT");
}

#[tokio::test]
async fn test_redeem_insufficient_balance() {
    let app = test_app().await;
    let student_token = signup_student(&app, "6401234").await;
    let admin_token = signin_admin(&app).await;

    send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&student_token),
        Some(json!({ "bottles": 40 })),
    )
    .await;

    // First redemption drains the balance, the second must fail
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/admin/redeem",
        Some(&admin_token),
        Some(json!({ "student_id": "6401234", "points": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/admin/redeem",
        Some(&admin_token),
        Some(json!({ "student_id": "6401234", "points": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "INSUFFICIENT_BALANCE");

    // The failed redemption changed nothing
    let (_, profile) = send(&app, "GET", "/api/v1/profile", Some(&student_token), None).await;
    assert_eq!(profile["points"], 0);
}

#[tokio::test]
async fn test_rate_change_applies_to_new_submissions() {
    let app = test_app().await;
    let student_token = signup_student(&app, "6401234").await;
    let admin_token = signin_admin(&app).await;

    let (status, rate) = send(
        &app,
        "PUT",
        "/api/v1/admin/rate",
        Some(&admin_token),
        Some(json!({ "bottles_per_unit": 20, "money_per_unit_satang": 300 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rate["is_active"], true);

    // Cache was invalidated: the submission prices at the new rate
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&student_token),
        Some(json!({ "bottles": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["money_received_satang"], 600);

    let (status, history) = send(
        &app,
        "GET",
        "/api/v1/admin/rate/history",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_stats() {
    let app = test_app().await;
    let student_token = signup_student(&app, "6401234").await;
    let admin_token = signin_admin(&app).await;

    send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&student_token),
        Some(json!({ "bottles": 25 })),
    )
    .await;

    let (status, stats) = send(
        &app,
        "GET",
        "/api/v1/admin/recycle/stats",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = stats.as_array().unwrap();
    // The bootstrapped admin has a profile too, so both rows appear
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["student_id"], "6401234");
    assert_eq!(entries[0]["total_bottles"], 25);
}

#[tokio::test]
async fn test_no_active_rate_fails_both_paths() {
    let (app, state) = test_app_with_state().await;
    let student_token = signup_student(&app, "6401234").await;
    let admin_token = signin_admin(&app).await;

    // Credit some points while a rate exists, then deactivate every rate
    send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&student_token),
        Some(json!({ "bottles": 40 })),
    )
    .await;
    state.db.rates().deactivate_all().await.unwrap();
    state.rate_cache.invalidate().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/recycle",
        Some(&student_token),
        Some(json!({ "bottles": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NO_ACTIVE_RATE");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/admin/redeem",
        Some(&admin_token),
        Some(json!({ "student_id": "6401234", "points": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NO_ACTIVE_RATE");

    // Neither failed operation touched the balance
    let (_, profile) = send(&app, "GET", "/api/v1/profile", Some(&student_token), None).await;
    assert_eq!(profile["points"], 40);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let app = test_app().await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/auth/signup",
        None,
        Some(json!({
            "student_id": "6401234",
            "name": "Test Student",
            "email": "6401234@school.ac.th",
            "password": "secret123",
        })),
    )
    .await;
    let refresh_token = body["refresh_token"].as_str().unwrap();

    let (status, tokens) = send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The refreshed access token works
    let access = tokens["access_token"].as_str().unwrap();
    let (status, _) = send(&app, "GET", "/api/v1/profile", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);

    // An access token is not accepted as a refresh token
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": access })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
