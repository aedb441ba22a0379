// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cross-garden statistics routes.

use crate::config::MAX_TOP_GARDENS;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::stats::{SystemStatistics, TrendBucket, UserStatistics};
use crate::AppState;
use axum::{
    extract::rejection::QueryRejection,
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Statistics routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stats/me", get(get_my_stats))
        .route("/api/stats/system", get(get_system_stats))
}

/// Statistics across the caller's gardens.
async fn get_my_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserStatistics>> {
    let stats = state.stats_service.user_statistics(&user).await?;
    Ok(Json(stats))
}

#[derive(Deserialize, Validate)]
struct SystemStatsQuery {
    /// Size of the top-gardens ranking
    #[validate(range(min = 1, max = MAX_TOP_GARDENS))]
    top: Option<usize>,
    /// Trend granularity
    #[serde(default)]
    bucket: TrendBucket,
}

/// System-wide statistics (admin only).
async fn get_system_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<SystemStatsQuery>, QueryRejection>,
) -> Result<Json<SystemStatistics>> {
    let Query(params) = query?;
    params.validate()?;
    let top = params
        .top
        .unwrap_or(state.stats_service.settings().top_gardens);

    tracing::debug!(
        user_id = %user.user_id,
        top,
        bucket = ?params.bucket,
        "Fetching system stats"
    );

    let stats = state
        .stats_service
        .system_statistics(&user, top, params.bucket)
        .await?;
    Ok(Json(stats))
}
