// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with FIRESTORE_EMULATOR_HOST pointing at a local emulator.
//!
//! The emulator provides a clean state for each test run.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use vgarden_tracker::error::AppError;
use vgarden_tracker::models::Role;
use vgarden_tracker::stats::{GardenStatistics, UserStatistics};

mod common;
use common::{record, test_db, test_garden, unique_id};

// ═══════════════════════════════════════════════════════════════════════════
// GARDEN TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_garden_roundtrip_and_owner_query() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_id("owner");
    let a = test_garden(&unique_id("garden"), "Zinnia wall", &owner);
    let b = test_garden(&unique_id("garden"), "Basil tower", &owner);

    assert!(db.get_garden(&a.id).await.unwrap().is_none());

    db.upsert_garden(&a).await.unwrap();
    db.upsert_garden(&b).await.unwrap();

    let fetched = db.get_garden(&a.id).await.unwrap().expect("garden exists");
    assert_eq!(fetched.name, "Zinnia wall");
    assert_eq!(fetched.owner_id, owner);

    let owned = db.get_gardens_for_owner(&owner).await.unwrap();
    let names: Vec<&str> = owned.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Basil tower", "Zinnia wall"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// ATOMIC LOGGING TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_log_activity_updates_totals() {
    require_emulator!();

    let db = test_db().await;
    let garden_id = unique_id("garden");

    let mut watering = record(&unique_id("r"), &garden_id, "riego", "2024-05-01T08:00:00Z", 750.0);
    watering.unit = Some("ml".to_string());
    let planting = record(&unique_id("r"), &garden_id, "planting", "2024-04-01T08:00:00Z", 12.0);

    assert!(db.log_activity_atomic(&watering).await.unwrap());
    assert!(db.log_activity_atomic(&planting).await.unwrap());

    let totals = db
        .get_garden_totals(&garden_id)
        .await
        .unwrap()
        .expect("totals created on first log");
    assert_eq!(totals.total_records, 2);
    assert_eq!(totals.watering_count, 1);
    assert_eq!(totals.planting_count, 1);
    assert!((totals.water_liters - 0.75).abs() < 1e-9);
    assert_eq!(totals.sown_total, 12.0);
    assert_eq!(totals.first_activity.as_deref(), Some("2024-04-01"));
    assert_eq!(totals.last_activity.as_deref(), Some("2024-05-01"));

    let records = db.get_records_for_garden(&garden_id).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_log_activity_is_idempotent() {
    require_emulator!();

    let db = test_db().await;
    let garden_id = unique_id("garden");
    let harvest = record(&unique_id("r"), &garden_id, "harvest", "2024-06-01T08:00:00Z", 3.0);

    assert!(db.log_activity_atomic(&harvest).await.unwrap());
    assert!(!db.log_activity_atomic(&harvest).await.unwrap());

    let totals = db.get_garden_totals(&garden_id).await.unwrap().unwrap();
    assert_eq!(totals.total_records, 1);
    assert_eq!(totals.harvested_total, 3.0);
}

#[tokio::test]
async fn test_record_id_reused_by_another_garden_is_rejected() {
    require_emulator!();

    let db = test_db().await;
    let first_garden = unique_id("garden");
    let second_garden = unique_id("garden");
    let record_id = unique_id("r");

    let original = record(&record_id, &first_garden, "watering", "2024-06-01T08:00:00Z", 2.0);
    assert!(db.log_activity_atomic(&original).await.unwrap());

    let hijack = record(&record_id, &second_garden, "harvest", "2024-06-02T08:00:00Z", 9.0);
    let result = db.log_activity_atomic(&hijack).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let first_records = db.get_records_for_garden(&first_garden).await.unwrap();
    assert_eq!(first_records.len(), 1);
    assert_eq!(first_records[0].kind, "watering");
    assert!(db.get_records_for_garden(&second_garden).await.unwrap().is_empty());
    assert!(db.get_garden_totals(&second_garden).await.unwrap().is_none());

    let totals = db.get_garden_totals(&first_garden).await.unwrap().unwrap();
    assert_eq!(totals.total_records, 1);
    assert_eq!(totals.harvest_count, 0);
}

#[tokio::test]
async fn test_records_since_filters_by_timestamp() {
    require_emulator!();

    let db = test_db().await;
    let garden_id = unique_id("garden");

    let old = record(&unique_id("r"), &garden_id, "watering", "2001-01-01T00:00:00Z", 1.0);
    let new = record(&unique_id("r"), &garden_id, "watering", "2099-01-01T00:00:00Z", 1.0);
    db.log_activity_atomic(&old).await.unwrap();
    db.log_activity_atomic(&new).await.unwrap();

    let since = db.get_records_since("2098-01-01T00:00:00Z").await.unwrap();
    assert!(since.iter().any(|r| r.id == new.id));
    assert!(!since.iter().any(|r| r.id == old.id));
}

// ═══════════════════════════════════════════════════════════════════════════
// HTTP TESTS
// ═══════════════════════════════════════════════════════════════════════════

async fn get_json(app: axum::Router, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (
        status,
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null),
    )
}

#[tokio::test]
async fn test_garden_stats_access_rules() {
    require_emulator!();

    let (app, state) = common::create_emulator_app().await;
    let owner = unique_id("owner");
    let garden = test_garden(&unique_id("garden"), "Lettuce ladder", &owner);
    state.db.upsert_garden(&garden).await.unwrap();
    state
        .db
        .log_activity_atomic(&record(&unique_id("r"), &garden.id, "watering", "2024-05-01T08:00:00Z", 2.0))
        .await
        .unwrap();

    let key = &state.config.jwt_signing_key;
    let uri = format!("/api/gardens/{}/stats", garden.id);

    let owner_token = common::create_test_jwt(&owner, Role::Resident, key);
    let (status, body) = get_json(app.clone(), &uri, &owner_token).await;
    assert_eq!(status, StatusCode::OK);
    let stats: GardenStatistics = serde_json::from_value(body).unwrap();
    assert_eq!(stats.garden.id, garden.id);
    assert_eq!(stats.summary.total_records, 1);
    assert_eq!(stats.water_data.len(), 1);

    let stranger_token = common::create_test_jwt("someone-else", Role::Resident, key);
    let (status, _) = get_json(app.clone(), &uri, &stranger_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let tech_token = common::create_test_jwt("tech", Role::Technician, key);
    let (status, _) = get_json(app.clone(), &uri, &tech_token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get_json(app, "/api/gardens/does-not-exist/stats", &tech_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_activity_then_user_stats() {
    require_emulator!();

    let (app, state) = common::create_emulator_app().await;
    let owner = unique_id("owner");
    let garden = test_garden(&unique_id("garden"), "Herb spiral", &owner);
    state.db.upsert_garden(&garden).await.unwrap();
    let token = common::create_test_jwt(&owner, Role::Resident, &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "id": unique_id("client"),
        "kind": "cosecha",
        "quantity": 1.5,
        "timestamp": "2024-08-01T10:00:00Z",
    })
    .to_string();

    for expected in [StatusCode::CREATED, StatusCode::OK] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/gardens/{}/activities", garden.id))
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }

    let (status, body) = get_json(app, "/api/stats/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    let stats: UserStatistics = serde_json::from_value(body).unwrap();
    assert_eq!(stats.summary.garden_count, 1);
    assert_eq!(stats.summary.totals.harvest_count, 1);
    assert_eq!(stats.summary.totals.total_harvested, 1.5);
    assert_eq!(stats.recent_activity.len(), 1);
    assert_eq!(stats.recent_activity[0].date.as_deref(), Some("2024-08-01"));
    assert_eq!(
        stats.recent_activity[0].garden_name.as_deref(),
        Some("Herb spiral")
    );
}

#[tokio::test]
async fn test_post_activity_reusing_foreign_record_id_conflicts() {
    require_emulator!();

    let (app, state) = common::create_emulator_app().await;
    let tech = common::create_test_jwt("tech", Role::Technician, &state.config.jwt_signing_key);
    let first = test_garden(&unique_id("garden"), "Mint column", "owner-a");
    let second = test_garden(&unique_id("garden"), "Chive column", "owner-b");
    state.db.upsert_garden(&first).await.unwrap();
    state.db.upsert_garden(&second).await.unwrap();

    let body = serde_json::json!({ "id": unique_id("client"), "kind": "riego", "quantity": 1 })
        .to_string();

    let mut statuses = Vec::new();
    for garden in [&first, &second] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/gardens/{}/activities", garden.id))
                    .header(header::AUTHORIZATION, format!("Bearer {}", tech))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        statuses.push(response.status());
    }

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(
        state.db.get_records_for_garden(&first.id).await.unwrap().len(),
        1
    );
}
