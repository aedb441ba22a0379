// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Period-over-period growth of the planting series.

use crate::stats::numeric::round_to;
use crate::stats::oldest_first;
use crate::stats::planting::PlantingEntry;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Decimal places kept on the growth rate.
pub const GROWTH_RATE_DECIMALS: u32 = 2;

/// One point of the growth series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GrowthEntry {
    pub planting_id: String,
    pub date: Option<String>,
    pub crop_label: Option<String>,
    pub sown: f64,
    pub harvested: f64,
    /// Absolute change in sown quantity from the previous entry
    #[serde(rename = "crecimiento")]
    pub growth: f64,
    /// Percentage change from the previous entry
    #[serde(rename = "tasa_crecimiento")]
    pub growth_rate_percent: f64,
}

/// Compute growth over the planting series, oldest first.
///
/// The first entry has no baseline and reports zero. A previous entry with
/// nothing sown also yields a zero rate.
pub fn growth_series(entries: &[PlantingEntry]) -> Vec<GrowthEntry> {
    let mut ordered: Vec<&PlantingEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| oldest_first(a.planted_at, b.planted_at));

    let mut out = Vec::with_capacity(ordered.len());
    let mut previous: Option<&PlantingEntry> = None;

    for entry in ordered {
        let (growth, rate) = match previous {
            None => (0.0, 0.0),
            Some(prev) => {
                let growth = entry.sown - prev.sown;
                let rate = if prev.sown > 0.0 {
                    round_to(growth / prev.sown * 100.0, GROWTH_RATE_DECIMALS)
                } else {
                    0.0
                };
                (growth, rate)
            }
        };

        out.push(GrowthEntry {
            planting_id: entry.planting_id.clone(),
            date: entry.date.clone(),
            crop_label: entry.crop_label.clone(),
            sown: entry.sown,
            harvested: entry.harvested,
            growth,
            growth_rate_percent: rate,
        });
        previous = Some(entry);
    }

    out
}

/// Keep only plantings of one crop (case-insensitive label match).
pub fn filter_crop(entries: Vec<PlantingEntry>, crop: &str) -> Vec<PlantingEntry> {
    let wanted = crop.trim().to_lowercase();
    entries
        .into_iter()
        .filter(|e| {
            e.crop_label
                .as_deref()
                .is_some_and(|label| label.trim().to_lowercase() == wanted)
        })
        .collect()
}
