// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cross-garden roll-ups for the user and system dashboards.

use crate::models::garden::{Garden, GardenInfo};
use crate::models::record::ActivityRecord;
use crate::models::totals::BasicTotals;
use crate::stats::classify::{classify, ActivityKind};
use crate::stats::numeric::{non_negative, safe_number};
use crate::stats::summary::GardenSummary;
use crate::stats::{clean_text, newest_first, series_or_empty, Series};
use crate::time_utils::{format_day, format_month, parse_timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

// ─── User Roll-up ────────────────────────────────────────────

/// Summary across all of a user's gardens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSummary {
    pub garden_count: u32,
    #[serde(flatten)]
    pub totals: GardenSummary,
}

/// One line of a recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecentActivity {
    pub id: String,
    pub garden_id: String,
    pub garden_name: Option<String>,
    pub kind: ActivityKind,
    pub date: Option<String>,
    pub quantity: f64,
    pub unit: Option<String>,
    pub note: Option<String>,
}

/// User statistics response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStatistics {
    pub user_gardens: Vec<GardenInfo>,
    pub summary: UserSummary,
    pub recent_activity: Vec<RecentActivity>,
}

#[derive(Debug)]
pub struct UserStatsInput {
    pub gardens: Vec<Garden>,
    /// Totals documents for those gardens (missing ones count as zero)
    pub totals: Vec<BasicTotals>,
    pub recent: Series<ActivityRecord>,
    pub recent_limit: usize,
}

/// Newest-first feed across gardens, capped at `limit`.
pub fn recent_activity(
    records: &[ActivityRecord],
    garden_names: &HashMap<&str, &str>,
    limit: usize,
) -> Vec<RecentActivity> {
    let mut dated: Vec<_> = records
        .iter()
        .map(|r| (r.timestamp.as_deref().and_then(parse_timestamp), r))
        .collect();
    dated.sort_by(|a, b| newest_first(a.0, b.0));

    dated
        .into_iter()
        .take(limit)
        .map(|(at, record)| RecentActivity {
            id: record.id.clone(),
            garden_id: record.garden_id.clone(),
            garden_name: garden_names
                .get(record.garden_id.as_str())
                .map(|name| name.to_string()),
            kind: classify(record).kind(),
            date: at.map(format_day),
            quantity: safe_number(record.quantity.as_ref()),
            unit: clean_text(record.unit.as_deref()),
            note: clean_text(record.free_text.as_deref()),
        })
        .collect()
}

pub fn summarize_user(input: UserStatsInput) -> UserStatistics {
    let mut merged = BasicTotals::default();
    for totals in &input.totals {
        merged.merge(totals);
    }

    let names: HashMap<&str, &str> = input
        .gardens
        .iter()
        .map(|g| (g.id.as_str(), g.name.as_str()))
        .collect();
    let recent = recent_activity(&series_or_empty(input.recent), &names, input.recent_limit);

    UserStatistics {
        summary: UserSummary {
            garden_count: input.gardens.len() as u32,
            totals: GardenSummary::from_totals(&merged),
        },
        user_gardens: input.gardens.iter().map(GardenInfo::from).collect(),
        recent_activity: recent,
    }
}

// ─── System Roll-up ──────────────────────────────────────────

/// Granularity of the activity trend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendBucket {
    #[default]
    Day,
    Month,
}

impl FromStr for TrendBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TrendBucket::Day),
            "month" => Ok(TrendBucket::Month),
            other => Err(format!("unknown trend bucket '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SystemOverview {
    pub total_gardens: u32,
    pub total_owners: u32,
    pub total_records: u32,
    pub watering_count: u32,
    pub planting_count: u32,
    pub harvest_count: u32,
    pub fertilizing_count: u32,
    pub pest_count: u32,
    pub maintenance_count: u32,
    pub total_water_liters: f64,
    pub total_harvested: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrendPoint {
    /// `YYYY-MM-DD` or `YYYY-MM`
    pub bucket: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TopGarden {
    pub garden_id: String,
    pub name: String,
    pub total_records: u32,
}

/// System statistics response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SystemStatistics {
    pub system_overview: SystemOverview,
    pub activity_trend: Vec<TrendPoint>,
    pub top_gardens: Vec<TopGarden>,
}

#[derive(Debug)]
pub struct SystemStatsInput {
    pub gardens: Vec<Garden>,
    pub totals: Vec<BasicTotals>,
    pub trend_records: Series<ActivityRecord>,
    pub bucket: TrendBucket,
    pub top_n: usize,
}

/// Record counts per bucket, oldest bucket first. Undated records are skipped.
pub fn activity_trend(records: &[ActivityRecord], bucket: TrendBucket) -> Vec<TrendPoint> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for record in records {
        let Some(at) = record.timestamp.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        let key = match bucket {
            TrendBucket::Day => format_day(at),
            TrendBucket::Month => format_month(at),
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(bucket, count)| TrendPoint { bucket, count })
        .collect()
}

/// Gardens ranked by logged record count, highest first, truncated to `n`.
///
/// Ties are broken by garden name so the ranking is stable across calls.
pub fn rank_top_gardens(gardens: &[Garden], totals: &[BasicTotals], n: usize) -> Vec<TopGarden> {
    let counts: HashMap<&str, u32> = totals
        .iter()
        .map(|t| (t.garden_id.as_str(), t.total_records))
        .collect();

    let mut ranked: Vec<TopGarden> = gardens
        .iter()
        .map(|g| TopGarden {
            garden_id: g.id.clone(),
            name: g.name.clone(),
            total_records: counts.get(g.id.as_str()).copied().unwrap_or(0),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_records
            .cmp(&a.total_records)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.garden_id.cmp(&b.garden_id))
    });
    ranked.truncate(n);
    ranked
}

pub fn system_overview(gardens: &[Garden], totals: &[BasicTotals]) -> SystemOverview {
    let known: HashSet<&str> = gardens.iter().map(|g| g.id.as_str()).collect();
    let mut merged = BasicTotals::default();
    for t in totals.iter().filter(|t| known.contains(t.garden_id.as_str())) {
        merged.merge(t);
    }

    let owners: HashSet<&str> = gardens
        .iter()
        .map(|g| g.owner_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    SystemOverview {
        total_gardens: gardens.len() as u32,
        total_owners: owners.len() as u32,
        total_records: merged.total_records,
        watering_count: merged.watering_count,
        planting_count: merged.planting_count,
        harvest_count: merged.harvest_count,
        fertilizing_count: merged.fertilizing_count,
        pest_count: merged.pest_count,
        maintenance_count: merged.maintenance_count,
        total_water_liters: non_negative(merged.water_liters),
        total_harvested: non_negative(merged.harvested_total),
    }
}

pub fn summarize_system(input: SystemStatsInput) -> SystemStatistics {
    let trend_records = series_or_empty(input.trend_records);

    let stats = SystemStatistics {
        system_overview: system_overview(&input.gardens, &input.totals),
        activity_trend: activity_trend(&trend_records, input.bucket),
        top_gardens: rank_top_gardens(&input.gardens, &input.totals, input.top_n),
    };

    tracing::debug!(
        gardens = stats.system_overview.total_gardens,
        trend_points = stats.activity_trend.len(),
        top = stats.top_gardens.len(),
        "System statistics computed"
    );

    stats
}
