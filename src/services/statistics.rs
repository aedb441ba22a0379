// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics service.
//!
//! Bridges the store and the statistics engine:
//! 1. Resolve the garden and check the caller may read it
//! 2. Fetch totals and series concurrently
//! 3. Hand everything to the pure engine in `crate::stats`
//!
//! Failed series fetches are passed to the engine as [`StatsError`] so the
//! response degrades to an empty series instead of failing outright.

use crate::config::StatsSettings;
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{BasicTotals, Garden, GardenInfo};
use crate::stats::rollup::{
    recent_activity, summarize_system, summarize_user, RecentActivity, SystemStatsInput,
    UserStatsInput,
};
use crate::stats::summary::{summarize_garden, summarize_growth, GrowthStatistics};
use crate::stats::{
    GardenStatistics, GardenStatsInput, Series, StatsError, SystemStatistics, TrendBucket,
    UserStatistics,
};
use std::collections::HashMap;

/// Convert a store result into an engine series.
fn series<T>(name: &'static str, fetched: Result<Vec<T>>) -> Series<T> {
    fetched.map_err(|e| StatsError::SeriesUnavailable {
        series: name,
        reason: e.to_string(),
    })
}

/// Read-side statistics operations.
#[derive(Clone)]
pub struct StatisticsService {
    db: FirestoreDb,
    settings: StatsSettings,
}

impl StatisticsService {
    pub fn new(db: FirestoreDb, settings: StatsSettings) -> Self {
        Self { db, settings }
    }

    pub fn settings(&self) -> &StatsSettings {
        &self.settings
    }

    /// Load a garden the user is allowed to read.
    ///
    /// Returns `NotFound` for unknown gardens and `Forbidden` when the
    /// garden exists but belongs to someone else.
    pub async fn authorized_garden(&self, user: &AuthUser, garden_id: &str) -> Result<Garden> {
        let garden = self
            .db
            .get_garden(garden_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Garden {} not found", garden_id)))?;

        if !user.can_view(&garden) {
            tracing::warn!(
                user_id = %user.user_id,
                garden_id,
                "Garden access denied"
            );
            return Err(AppError::Forbidden(format!(
                "No access to garden {}",
                garden_id
            )));
        }

        Ok(garden)
    }

    /// Full statistics for one garden.
    pub async fn garden_statistics(
        &self,
        user: &AuthUser,
        garden_id: &str,
    ) -> Result<GardenStatistics> {
        let garden = self.authorized_garden(user, garden_id).await?;

        let (totals, records, fertilizer, pests) = tokio::join!(
            self.db.get_garden_totals(garden_id),
            self.db.get_records_for_garden(garden_id),
            self.db.get_fertilizer_details(garden_id),
            self.db.get_pest_details(garden_id),
        );

        let totals = totals?.unwrap_or_else(|| BasicTotals::for_garden(garden_id));

        Ok(summarize_garden(GardenStatsInput {
            garden: GardenInfo::from(&garden),
            totals,
            records: series("records", records),
            fertilizer_details: Some(series("fertilizer_details", fertilizer)),
            pest_details: Some(series("pest_details", pests)),
            harvest_policy: self.settings.harvest_policy,
        }))
    }

    /// Growth series for one garden, optionally restricted to a crop.
    pub async fn growth_statistics(
        &self,
        user: &AuthUser,
        garden_id: &str,
        crop: Option<&str>,
    ) -> Result<GrowthStatistics> {
        self.authorized_garden(user, garden_id).await?;

        let records = self.db.get_records_for_garden(garden_id).await;

        Ok(summarize_growth(
            garden_id,
            series("records", records),
            crop,
            self.settings.harvest_policy,
        ))
    }

    /// Most recent activity of one garden.
    pub async fn garden_activity(
        &self,
        user: &AuthUser,
        garden_id: &str,
        limit: usize,
    ) -> Result<Vec<RecentActivity>> {
        let garden = self.authorized_garden(user, garden_id).await?;

        let records = self.db.get_recent_records(garden_id, limit as u32).await?;
        let names = HashMap::from([(garden.id.as_str(), garden.name.as_str())]);

        Ok(recent_activity(&records, &names, limit))
    }

    /// Statistics across the caller's own gardens.
    pub async fn user_statistics(&self, user: &AuthUser) -> Result<UserStatistics> {
        let gardens = self.db.get_gardens_for_owner(&user.user_id).await?;
        let ids: Vec<String> = gardens.iter().map(|g| g.id.clone()).collect();
        let limit = self.settings.recent_activity_limit;

        let (totals, recent) = tokio::join!(
            self.db.get_totals_for_gardens(&ids),
            self.db.get_recent_records_for_gardens(&ids, limit as u32),
        );

        let stats = summarize_user(UserStatsInput {
            gardens,
            totals: totals?.into_values().collect(),
            recent: series("recent_activity", recent),
            recent_limit: limit,
        });

        tracing::debug!(
            user_id = %user.user_id,
            gardens = stats.summary.garden_count,
            recent = stats.recent_activity.len(),
            "User statistics computed"
        );

        Ok(stats)
    }

    /// System-wide statistics. Admin only.
    pub async fn system_statistics(
        &self,
        user: &AuthUser,
        top_n: usize,
        bucket: TrendBucket,
    ) -> Result<SystemStatistics> {
        if !user.is_admin() {
            return Err(AppError::Forbidden(
                "System statistics require the admin role".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let since = crate::time_utils::format_utc_rfc3339(
            chrono::Duration::try_days(self.settings.trend_window_days)
                .and_then(|window| now.checked_sub_signed(window))
                .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC),
        );

        let (gardens, totals, trend) = tokio::join!(
            self.db.list_gardens(),
            self.db.list_garden_totals(),
            self.db.get_records_since(&since),
        );

        Ok(summarize_system(SystemStatsInput {
            gardens: gardens?,
            totals: totals?,
            trend_records: series("activity_trend", trend),
            bucket,
            top_n,
        }))
    }
}
