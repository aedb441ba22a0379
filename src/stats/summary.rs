// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garden-level roll-up.
//!
//! Combines the precomputed totals document with every per-kind series into
//! the single response a garden dashboard needs.

use crate::models::garden::GardenInfo;
use crate::models::record::{ActivityRecord, DetailedFertilizerRecord, DetailedPestRecord};
use crate::models::totals::BasicTotals;
use crate::stats::classify::{classify_all, ClassifiedRecord};
use crate::stats::fertilizer::{aggregate_fertilizer, FertilizerEntry, FertilizerInput};
use crate::stats::growth::{filter_crop, growth_series, GrowthEntry, GROWTH_RATE_DECIMALS};
use crate::stats::maintenance::{aggregate_maintenance, MaintenanceEntry};
use crate::stats::numeric::{non_negative, round_to};
use crate::stats::pest::{aggregate_pests, PestEntry, PestInput};
use crate::stats::planting::{aggregate_plantings, HarvestMatchPolicy, PlantingEntry};
use crate::stats::water::{aggregate_water, WaterEntry};
use crate::stats::{series_or_empty, Series};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Headline numbers for a garden (or a set of gardens).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GardenSummary {
    pub total_records: u32,
    pub watering_count: u32,
    pub planting_count: u32,
    pub harvest_count: u32,
    pub fertilizing_count: u32,
    pub pest_count: u32,
    pub maintenance_count: u32,
    pub total_water_liters: f64,
    pub total_sown: f64,
    pub total_harvested: f64,
    pub total_fertilizer_kg: f64,
    pub total_pests: f64,
    /// Harvested as a percentage of sown
    pub yield_percent: f64,
    pub first_activity: Option<String>,
    pub last_activity: Option<String>,
}

impl GardenSummary {
    pub fn from_totals(totals: &BasicTotals) -> Self {
        let sown = non_negative(totals.sown_total);
        let harvested = non_negative(totals.harvested_total);
        let yield_percent = if sown > 0.0 {
            round_to(harvested / sown * 100.0, GROWTH_RATE_DECIMALS)
        } else {
            0.0
        };

        Self {
            total_records: totals.total_records,
            watering_count: totals.watering_count,
            planting_count: totals.planting_count,
            harvest_count: totals.harvest_count,
            fertilizing_count: totals.fertilizing_count,
            pest_count: totals.pest_count,
            maintenance_count: totals.maintenance_count,
            total_water_liters: non_negative(totals.water_liters),
            total_sown: sown,
            total_harvested: harvested,
            total_fertilizer_kg: non_negative(totals.fertilizer_kg),
            total_pests: non_negative(totals.pests_total),
            yield_percent,
            first_activity: totals.first_activity.clone(),
            last_activity: totals.last_activity.clone(),
        }
    }
}

/// Everything the garden roll-up consumes.
#[derive(Debug)]
pub struct GardenStatsInput {
    pub garden: GardenInfo,
    pub totals: BasicTotals,
    pub records: Series<ActivityRecord>,
    /// `None` when the store has no detail rows for this garden
    pub fertilizer_details: Option<Series<DetailedFertilizerRecord>>,
    pub pest_details: Option<Series<DetailedPestRecord>>,
    pub harvest_policy: HarvestMatchPolicy,
}

/// Garden statistics response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GardenStatistics {
    pub garden: GardenInfo,
    pub summary: GardenSummary,
    pub water_data: Vec<WaterEntry>,
    pub planting_data: Vec<PlantingEntry>,
    pub fertilizer_data: Vec<FertilizerEntry>,
    pub pest_data: Vec<PestEntry>,
    pub maintenance_data: Vec<MaintenanceEntry>,
}

/// Growth statistics response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GrowthStatistics {
    pub garden_id: String,
    /// Crop filter, when one was requested
    pub plant_id: Option<String>,
    pub growth_data: Vec<GrowthEntry>,
}

pub fn summarize_garden(input: GardenStatsInput) -> GardenStatistics {
    let classified: Vec<ClassifiedRecord> = classify_all(&series_or_empty(input.records));

    let fertilizer_fetch_failed = matches!(input.fertilizer_details, Some(Err(_)));
    let pest_fetch_failed = matches!(input.pest_details, Some(Err(_)));

    let fertilizer = FertilizerInput::select(
        input.fertilizer_details.map(series_or_empty),
        classified.clone(),
    );
    let pests = PestInput::select(input.pest_details.map(series_or_empty), classified.clone());

    tracing::debug!(
        garden_id = %input.garden.id,
        fertilizer_source = fertilizer.source(),
        fertilizer_fetch_failed,
        pest_source = pests.source(),
        pest_fetch_failed,
        "Detail series sources selected"
    );

    let stats = GardenStatistics {
        summary: GardenSummary::from_totals(&input.totals),
        water_data: aggregate_water(&classified),
        planting_data: aggregate_plantings(&classified, input.harvest_policy),
        fertilizer_data: aggregate_fertilizer(&fertilizer),
        pest_data: aggregate_pests(&pests),
        maintenance_data: aggregate_maintenance(&classified),
        garden: input.garden,
    };

    tracing::debug!(
        garden_id = %stats.garden.id,
        records = classified.len(),
        water = stats.water_data.len(),
        plantings = stats.planting_data.len(),
        fertilizer = stats.fertilizer_data.len(),
        pests = stats.pest_data.len(),
        maintenance = stats.maintenance_data.len(),
        "Garden statistics computed"
    );

    stats
}

pub fn summarize_growth(
    garden_id: &str,
    records: Series<ActivityRecord>,
    crop: Option<&str>,
    policy: HarvestMatchPolicy,
) -> GrowthStatistics {
    let classified = classify_all(&series_or_empty(records));
    let mut plantings = aggregate_plantings(&classified, policy);
    if let Some(crop) = crop {
        plantings = filter_crop(plantings, crop);
    }

    GrowthStatistics {
        garden_id: garden_id.to_string(),
        plant_id: crop.map(str::to_string),
        growth_data: growth_series(&plantings),
    }
}
