// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging service.
//!
//! Validates incoming activity reports, normalizes them into the stored
//! [`ActivityRecord`] shape and writes them together with the garden's
//! totals in a single transaction.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{ActivityRecord, SoilChange};
use crate::stats::numeric::RawNumber;
use crate::time_utils::{format_utc_rfc3339, parse_timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Body of `POST /api/gardens/{gardenId}/activities`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogActivityRequest {
    /// Client-chosen record ID; resubmitting the same ID is a no-op
    #[validate(length(min = 1, max = 64))]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub kind: String,
    /// When the event happened; defaults to now
    pub timestamp: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
    #[validate(length(max = 16))]
    pub unit: Option<String>,
    #[validate(length(max = 64))]
    pub linked_planting_id: Option<String>,
    #[validate(length(max = 64))]
    pub planting_label: Option<String>,
    #[serde(default)]
    pub soil_changed: SoilChange,
    #[validate(length(max = 64))]
    pub pest_species: Option<String>,
    #[validate(length(max = 32))]
    pub pest_severity: Option<String>,
    #[validate(length(max = 500))]
    pub free_text: Option<String>,
}

/// Result of logging an activity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogActivityResponse {
    pub record_id: String,
    /// `false` when the record ID had already been logged
    pub created: bool,
}

/// Validate a request and build the record to store.
pub fn build_record(garden_id: &str, request: LogActivityRequest) -> Result<ActivityRecord> {
    request.validate()?;

    let kind = request.kind.trim();
    if kind.is_empty() {
        return Err(AppError::BadRequest("kind must not be blank".to_string()));
    }

    if let Some(quantity) = request.quantity {
        if !quantity.is_finite() {
            return Err(AppError::BadRequest(
                "quantity must be a finite number".to_string(),
            ));
        }
    }

    let at = match request.timestamp.as_deref() {
        Some(raw) => parse_timestamp(raw).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid timestamp: {}", raw))
        })?,
        None => chrono::Utc::now(),
    };

    Ok(ActivityRecord {
        id: request
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        garden_id: garden_id.to_string(),
        kind: kind.to_lowercase(),
        timestamp: Some(format_utc_rfc3339(at)),
        quantity: request.quantity.map(RawNumber::Number),
        unit: request.unit,
        linked_planting_id: request.linked_planting_id,
        planting_label: request.planting_label,
        soil_changed: request.soil_changed,
        pest_species: request.pest_species,
        pest_severity: request.pest_severity,
        free_text: request.free_text,
    })
}

/// Write-side activity operations.
#[derive(Clone)]
pub struct ActivityLogService {
    db: FirestoreDb,
}

impl ActivityLogService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Store a validated record for a garden whose access was already checked.
    pub async fn log_record(&self, record: ActivityRecord) -> Result<LogActivityResponse> {
        tracing::info!(
            garden_id = %record.garden_id,
            record_id = %record.id,
            kind = %record.kind,
            "Logging activity"
        );

        let created = self.db.log_activity_atomic(&record).await?;

        Ok(LogActivityResponse {
            record_id: record.id,
            created,
        })
    }
}
