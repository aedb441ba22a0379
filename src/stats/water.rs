// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Water aggregator.

use crate::stats::classify::{ClassifiedRecord, Payload};
use crate::stats::newest_first;
use crate::stats::numeric::non_negative;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const MILLILITERS_PER_LITER: f64 = 1000.0;

/// Convert a recorded volume to liters.
///
/// Milliliter spellings divide by 1000; anything else (including no unit)
/// is taken as liters.
pub fn to_liters(quantity: f64, unit: Option<&str>) -> f64 {
    let quantity = non_negative(quantity);
    let unit = unit.map(|u| u.trim().to_lowercase()).unwrap_or_default();
    match unit.as_str() {
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" | "mililitro"
        | "mililitros" => quantity / MILLILITERS_PER_LITER,
        _ => quantity,
    }
}

/// One watering event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WaterEntry {
    pub record_id: String,
    pub date: Option<String>,
    pub quantity_liters: f64,
    /// Display mirror of `quantity_liters`, rounded
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub quantity_milliliters: i64,
    pub planting_label: Option<String>,
}

/// One entry per watering record, newest first. Same-day records are not merged.
pub fn aggregate_water(records: &[ClassifiedRecord]) -> Vec<WaterEntry> {
    let mut waterings: Vec<&ClassifiedRecord> = records
        .iter()
        .filter(|r| matches!(r.payload, Payload::Watering { .. }))
        .collect();
    waterings.sort_by(|a, b| newest_first(a.at, b.at));

    let entries: Vec<WaterEntry> = waterings
        .into_iter()
        .filter_map(|r| match &r.payload {
            Payload::Watering {
                liters,
                planting_label,
            } => Some(WaterEntry {
                record_id: r.id.clone(),
                date: r.day(),
                quantity_liters: *liters,
                quantity_milliliters: (liters * MILLILITERS_PER_LITER).round() as i64,
                planting_label: planting_label.clone(),
            }),
            _ => None,
        })
        .collect();

    tracing::debug!(entries = entries.len(), "Water series computed");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn watering(id: &str, day: u32, liters: f64) -> ClassifiedRecord {
        ClassifiedRecord {
            id: id.to_string(),
            garden_id: "g1".to_string(),
            at: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).single(),
            payload: Payload::Watering {
                liters,
                planting_label: Some("lettuce".to_string()),
            },
        }
    }

    #[test]
    fn test_to_liters_units() {
        assert_eq!(to_liters(500.0, Some("ml")), 0.5);
        assert_eq!(to_liters(500.0, Some(" mL ")), 0.5);
        assert_eq!(to_liters(250.0, Some("mililitros")), 0.25);
        assert_eq!(to_liters(2.0, Some("L")), 2.0);
        assert_eq!(to_liters(2.0, Some("litros")), 2.0);
        assert_eq!(to_liters(3.0, None), 3.0);
        assert_eq!(to_liters(-1.0, Some("l")), 0.0);
    }

    #[test]
    fn test_aggregate_water_newest_first_without_merging() {
        let records = vec![
            watering("a", 1, 1.0),
            watering("b", 5, 0.75),
            watering("c", 5, 2.0),
        ];

        let series = aggregate_water(&records);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date.as_deref(), Some("2024-03-05"));
        assert_eq!(series[0].record_id, "b");
        assert_eq!(series[0].quantity_milliliters, 750);
        assert_eq!(series[1].record_id, "c");
        assert_eq!(series[2].record_id, "a");
        assert_eq!(series[2].planting_label.as_deref(), Some("lettuce"));
    }

    #[test]
    fn test_aggregate_water_ignores_other_kinds() {
        let other = ClassifiedRecord {
            id: "x".to_string(),
            garden_id: "g1".to_string(),
            at: None,
            payload: Payload::General,
        };
        assert!(aggregate_water(&[other]).is_empty());
        assert!(aggregate_water(&[]).is_empty());
    }

    #[test]
    fn test_milliliter_mirror_round_trip() {
        for ml in [1.0, 333.0, 500.0, 1234.0] {
            let liters = to_liters(ml, Some("ml"));
            assert_eq!((liters * MILLILITERS_PER_LITER).round(), ml);
        }
    }
}
