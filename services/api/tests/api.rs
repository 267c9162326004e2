//! services/api/tests/api.rs
//!
//! Drives the full router against the seeded in-memory dataset.

use api_lib::adapters::{seed::SEED_PASSWORD, seeded_store};
use api_lib::config::Config;
use api_lib::credentials::TokenIssuer;
use api_lib::web::{build_router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use mentorsphere_core::{Role, TieredStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn app() -> Router {
    let store = seeded_store(Utc::now()).unwrap();
    let tiered = Arc::new(TieredStore::local_only(Arc::new(store)));
    let config = Arc::new(Config::for_local_use(SECRET));
    build_router(Arc::new(AppState::new(config, tiered)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_login_and_complete_a_module() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ada", "email": "ada@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["role"], "student");

    let token = login(&app, "ada@x.com", "secret1").await;
    let claims = TokenIssuer::new(SECRET, Duration::hours(24))
        .validate(&token)
        .unwrap();
    assert_eq!(claims.role, Role::Student);
    assert_eq!(claims.email, "ada@x.com");

    let (before_status, before) = send(&app, "GET", "/api/courses/1", Some(&token), None).await;
    assert_eq!(before_status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/courses/1/modules/3",
        Some(&token),
        Some(json!({ "status": "completed", "score": 92 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, after) = send(&app, "GET", "/api/courses/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let before_modules = before["data"]["modules"].as_array().unwrap();
    let after_modules = after["data"]["modules"].as_array().unwrap();
    assert_eq!(before_modules.len(), after_modules.len());
    for (old, new) in before_modules.iter().zip(after_modules) {
        if new["id"] == 3 {
            assert_eq!(new["status"], "completed");
            assert_eq!(new["score"], 92);
        } else {
            assert_eq!(old, new);
        }
    }
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "budi@student.com", "password": "not-the-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn roles_gate_their_routes() {
    let app = app();
    let student = login(&app, "budi@student.com", SEED_PASSWORD).await;
    let mentor = login(&app, "hendra@mentor.com", SEED_PASSWORD).await;

    let (status, _) = send(&app, "GET", "/api/mentor/dashboard", Some(&student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/student/dashboard", Some(&mentor), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/api/mentor/dashboard", Some(&mentor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn marking_a_notification_read_twice_succeeds() {
    let app = app();
    let mentor = login(&app, "hendra@mentor.com", SEED_PASSWORD).await;

    for _ in 0..2 {
        let (status, body) = send(
            &app,
            "PUT",
            "/api/mentor/notifications/1/read",
            Some(&mentor),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["read"], true);
    }
}

#[tokio::test]
async fn students_see_and_clear_intervention_notices() {
    let app = app();
    let mentor = login(&app, "hendra@mentor.com", SEED_PASSWORD).await;
    let student = login(&app, "budi@student.com", SEED_PASSWORD).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/mentor/interventions",
        Some(&mentor),
        Some(json!({ "studentId": "1", "type": "reminder", "message": "Quiz on Friday" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/api/student/notifications", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["read"], false);
    let id = items[0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/student/notifications/{}/read", id),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["read"], true);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/student/notifications/read-all",
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 0);

    let (status, _) = send(&app, "GET", "/api/student/notifications", Some(&mentor), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn out_of_range_daily_goal_is_rejected() {
    let app = app();
    let token = login(&app, "budi@student.com", SEED_PASSWORD).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/user/settings/learning",
        Some(&token),
        Some(json!({ "dailyGoal": 4294967295u64 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/student/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_settings_section_is_rejected() {
    let app = app();
    let token = login(&app, "siti@student.com", SEED_PASSWORD).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/user/settings/telepathy",
        Some(&token),
        Some(json!({ "enabled": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_json_gets_an_error_envelope() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn health_reports_local_storage() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "local");
}
