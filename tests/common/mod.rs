// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;
use vgarden_tracker::config::Config;
use vgarden_tracker::db::FirestoreDb;
use vgarden_tracker::middleware::auth::create_jwt;
use vgarden_tracker::models::{ActivityRecord, Garden, Role};
use vgarden_tracker::routes::create_router;
use vgarden_tracker::stats::numeric::RawNumber;
use vgarden_tracker::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), test_db_offline()));
    (create_router(state.clone()), state)
}

/// Create a test app backed by the emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), test_db().await));
    (create_router(state.clone()), state)
}

/// Create a session token for a user with the given role.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, role: Role, signing_key: &[u8]) -> String {
    create_jwt(user_id, role, signing_key).expect("Failed to create test JWT")
}

/// Generate a unique ID for test isolation.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

#[allow(dead_code)]
pub fn test_garden(id: &str, name: &str, owner_id: &str) -> Garden {
    Garden {
        id: id.to_string(),
        name: name.to_string(),
        owner_id: owner_id.to_string(),
        location: Some("Rooftop".to_string()),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// Build a stored record with a numeric quantity.
#[allow(dead_code)]
pub fn record(id: &str, garden_id: &str, kind: &str, timestamp: &str, quantity: f64) -> ActivityRecord {
    ActivityRecord {
        id: id.to_string(),
        garden_id: garden_id.to_string(),
        kind: kind.to_string(),
        timestamp: Some(timestamp.to_string()),
        quantity: Some(RawNumber::Number(quantity)),
        ..Default::default()
    }
}
