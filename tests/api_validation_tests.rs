// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.
//!
//! Validation runs before any store access, so these all work against the
//! offline mock store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use vgarden_tracker::models::Role;

mod common;

async fn get_as(role: Role, uri: &str) -> StatusCode {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("u1", role, &state.config.jwt_signing_key);

    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
    .status()
}

async fn post_activity(body: &str) -> (StatusCode, serde_json::Value) {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("u1", Role::Resident, &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/gardens/g1/activities")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_activity_limit_out_of_range() {
    assert_eq!(
        get_as(Role::Resident, "/api/gardens/g1/activities?limit=0").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get_as(Role::Resident, "/api/gardens/g1/activities?limit=101").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_activity_limit_not_a_number() {
    assert_eq!(
        get_as(Role::Resident, "/api/gardens/g1/activities?limit=lots").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_growth_crop_too_long() {
    let uri = format!("/api/gardens/g1/growth?crop={}", "a".repeat(65));
    assert_eq!(get_as(Role::Resident, &uri).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_system_top_out_of_range() {
    assert_eq!(
        get_as(Role::Admin, "/api/stats/system?top=0").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get_as(Role::Admin, "/api/stats/system?top=51").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_system_unknown_bucket() {
    assert_eq!(
        get_as(Role::Admin, "/api/stats/system?bucket=week").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_system_valid_params_reach_store() {
    // Offline store: validation and role checks pass, the fetch fails.
    assert_eq!(
        get_as(Role::Admin, "/api/stats/system?top=3&bucket=month").await,
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_log_activity_blank_kind() {
    let (status, body) = post_activity(r#"{"kind": "   "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_log_activity_negative_quantity() {
    let (status, body) = post_activity(r#"{"kind": "watering", "quantity": -3}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_log_activity_note_too_long() {
    let body = serde_json::json!({
        "kind": "maintenance",
        "freeText": "x".repeat(501),
    })
    .to_string();
    let (status, _) = post_activity(&body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_log_activity_bad_timestamp() {
    let (status, body) = post_activity(r#"{"kind": "riego", "timestamp": "last tuesday"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]
        .as_str()
        .unwrap_or_default()
        .contains("timestamp"));
}

#[tokio::test]
async fn test_log_activity_valid_body_reaches_store() {
    let (status, body) = post_activity(r#"{"kind": "riego", "quantity": 500, "unit": "ml"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Store details are not leaked
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_log_activity_malformed_json() {
    let (status, body) = post_activity(r#"{"kind": "riego", "quantity": }"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/no/such/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "not_found");
}
