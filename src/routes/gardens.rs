// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-garden API routes.

use crate::config::MAX_RECENT_ACTIVITY;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::activity_log::build_record;
use crate::services::{LogActivityRequest, LogActivityResponse};
use crate::stats::rollup::RecentActivity;
use crate::stats::summary::GrowthStatistics;
use crate::stats::GardenStatistics;
use crate::AppState;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Garden routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/gardens/{garden_id}/stats", get(get_garden_stats))
        .route("/api/gardens/{garden_id}/growth", get(get_growth))
        .route(
            "/api/gardens/{garden_id}/activities",
            get(get_activities).post(log_activity),
        )
}

// ─── Statistics ──────────────────────────────────────────────

/// Full statistics for one garden.
async fn get_garden_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(garden_id): Path<String>,
) -> Result<Json<GardenStatistics>> {
    tracing::debug!(user_id = %user.user_id, garden_id = %garden_id, "Fetching garden stats");

    let stats = state
        .stats_service
        .garden_statistics(&user, &garden_id)
        .await?;
    Ok(Json(stats))
}

#[derive(Deserialize, Validate)]
struct GrowthQuery {
    /// Restrict to one crop label
    #[validate(length(min = 1, max = 64))]
    crop: Option<String>,
}

/// Growth series for one garden.
async fn get_growth(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(garden_id): Path<String>,
    query: std::result::Result<Query<GrowthQuery>, QueryRejection>,
) -> Result<Json<GrowthStatistics>> {
    let Query(params) = query?;
    params.validate()?;

    let growth = state
        .stats_service
        .growth_statistics(&user, &garden_id, params.crop.as_deref())
        .await?;
    Ok(Json(growth))
}

// ─── Activity Log ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct ActivitiesQuery {
    /// Number of records to return (newest first)
    #[validate(range(min = 1, max = MAX_RECENT_ACTIVITY))]
    limit: Option<usize>,
}

/// Recent activity response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub garden_id: String,
    pub activities: Vec<RecentActivity>,
}

/// Recent activity of one garden.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(garden_id): Path<String>,
    query: std::result::Result<Query<ActivitiesQuery>, QueryRejection>,
) -> Result<Json<ActivitiesResponse>> {
    let Query(params) = query?;
    params.validate()?;
    let limit = params
        .limit
        .unwrap_or(state.stats_service.settings().recent_activity_limit);

    let activities = state
        .stats_service
        .garden_activity(&user, &garden_id, limit)
        .await?;

    Ok(Json(ActivitiesResponse {
        garden_id,
        activities,
    }))
}

/// Log a new activity for a garden.
///
/// Returns `201 Created` for a new record and `200 OK` when the record ID
/// had already been logged.
async fn log_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(garden_id): Path<String>,
    body: std::result::Result<Json<LogActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LogActivityResponse>)> {
    let Json(request) = body?;
    let record = build_record(&garden_id, request)?;

    state
        .stats_service
        .authorized_garden(&user, &garden_id)
        .await?;

    let response = state.activity_log.log_record(record).await?;

    let status = if response.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(response)))
}
