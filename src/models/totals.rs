// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-garden activity totals.
//!
//! These aggregates are maintained when activities are logged, so headline
//! numbers on dashboards cost one read instead of a scan of every record.

use crate::stats::classify::{ClassifiedRecord, Payload};
use crate::stats::fertilizer::comment_quantity_kg;
use crate::stats::numeric::{lenient_f64, lenient_u32};
use crate::stats::pest::sighting_count;
use serde::{Deserialize, Serialize};

/// Pre-computed totals for a garden.
///
/// Stored at: `garden_totals/{garden_id}`
///
/// Numeric fields decode leniently: strings are parsed, anything unusable
/// is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicTotals {
    #[serde(default)]
    pub garden_id: String,

    // ─── Counts ──────────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_records: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub watering_count: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub planting_count: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub harvest_count: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub fertilizing_count: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub pest_count: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub maintenance_count: u32,

    // ─── Quantities ──────────────────────────────────────────────
    #[serde(default, deserialize_with = "lenient_f64")]
    pub water_liters: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sown_total: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub harvested_total: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fertilizer_kg: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pests_total: f64,

    // ─── Activity Span ───────────────────────────────────────────
    /// Earliest activity day (`YYYY-MM-DD`)
    #[serde(default)]
    pub first_activity: Option<String>,
    /// Latest activity day (`YYYY-MM-DD`)
    #[serde(default)]
    pub last_activity: Option<String>,

    #[serde(default)]
    pub updated_at: String,
}

impl BasicTotals {
    pub fn for_garden(garden_id: &str) -> Self {
        Self {
            garden_id: garden_id.to_string(),
            ..Default::default()
        }
    }

    /// Update totals with a newly logged record.
    ///
    /// Callers must only pass records not yet counted; the store checks
    /// record existence in the same transaction.
    pub fn update_from_record(&mut self, record: &ClassifiedRecord, now: &str) {
        self.updated_at = now.to_string();
        self.total_records += 1;

        match &record.payload {
            Payload::Watering { liters, .. } => {
                self.watering_count += 1;
                self.water_liters += liters;
            }
            Payload::Planting { sown, .. } => {
                self.planting_count += 1;
                self.sown_total += sown;
            }
            Payload::Harvest { harvested, .. } => {
                self.harvest_count += 1;
                self.harvested_total += harvested;
            }
            Payload::Fertilizing {
                quantity,
                unit,
                note,
                ..
            } => {
                self.fertilizing_count += 1;
                self.fertilizer_kg += comment_quantity_kg(*quantity, unit.as_deref(), note.as_deref());
            }
            Payload::Pest { count, .. } => {
                self.pest_count += 1;
                self.pests_total += sighting_count(*count);
            }
            Payload::Maintenance { .. } => self.maintenance_count += 1,
            Payload::General => {}
        }

        if let Some(day) = record.day() {
            if self.first_activity.as_ref().map_or(true, |first| day < *first) {
                self.first_activity = Some(day.clone());
            }
            if self.last_activity.as_ref().map_or(true, |last| day > *last) {
                self.last_activity = Some(day);
            }
        }
    }

    /// Fold another garden's totals into these.
    pub fn merge(&mut self, other: &BasicTotals) {
        self.total_records += other.total_records;
        self.watering_count += other.watering_count;
        self.planting_count += other.planting_count;
        self.harvest_count += other.harvest_count;
        self.fertilizing_count += other.fertilizing_count;
        self.pest_count += other.pest_count;
        self.maintenance_count += other.maintenance_count;
        self.water_liters += other.water_liters;
        self.sown_total += other.sown_total;
        self.harvested_total += other.harvested_total;
        self.fertilizer_kg += other.fertilizer_kg;
        self.pests_total += other.pests_total;

        self.first_activity = match (self.first_activity.take(), other.first_activity.clone()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.last_activity = match (self.last_activity.take(), other.last_activity.clone()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }
}
