// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fertilizer aggregator.
//!
//! Two input shapes exist. When the store has pre-joined detail rows they
//! are passed through one entry per row. Otherwise the raw fertilizing
//! comments are grouped per day, with the quantity taken from the record,
//! then from its free text, then from [`DEFAULT_FERTILIZER_KG`].

use crate::models::record::{DetailedFertilizerRecord, SoilChange};
use crate::stats::classify::{ClassifiedRecord, Payload};
use crate::stats::numeric::{non_negative, parse_decimal, safe_number};
use crate::stats::{clean_text, newest_first, DayBuckets};
use crate::time_utils::{format_day, parse_timestamp};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Quantity credited to a fertilizing comment with no usable number.
pub const DEFAULT_FERTILIZER_KG: f64 = 2.0;

/// Unit reported when a detail row carries none.
pub const DEFAULT_FERTILIZER_UNIT: &str = "kg";

const GRAMS_PER_KG: f64 = 1000.0;

static RE_MASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(kilogramos?|kilos?|kgs?|gramos?|grs?|g)\b").unwrap()
});

/// Extract a mass from free text, in kg ("Aplicado 3kg de compost" -> 3).
pub fn extract_mass_kg(text: &str) -> Option<f64> {
    let caps = RE_MASS.captures(text)?;
    let amount = parse_decimal(caps.get(1)?.as_str())?;
    let unit = caps.get(2)?.as_str();
    Some(non_negative(mass_to_kg(amount, Some(unit))))
}

/// Convert a mass in the given unit to kg. Unknown units are taken as kg.
pub fn mass_to_kg(amount: f64, unit: Option<&str>) -> f64 {
    let unit = unit.map(|u| u.trim().to_lowercase()).unwrap_or_default();
    match unit.as_str() {
        "g" | "gr" | "grs" | "gramo" | "gramos" | "gram" | "grams" => amount / GRAMS_PER_KG,
        _ => amount,
    }
}

/// Quantity credited to one raw fertilizing record, in kg.
pub fn comment_quantity_kg(quantity: Option<f64>, unit: Option<&str>, note: Option<&str>) -> f64 {
    if let Some(q) = quantity {
        return non_negative(mass_to_kg(q, unit));
    }
    note.and_then(extract_mass_kg)
        .unwrap_or(DEFAULT_FERTILIZER_KG)
}

/// The two fertilizer input shapes.
#[derive(Debug, Clone)]
pub enum FertilizerInput {
    Detailed(Vec<DetailedFertilizerRecord>),
    Raw(Vec<ClassifiedRecord>),
}

impl FertilizerInput {
    /// Prefer detail rows when any were supplied.
    pub fn select(
        detailed: Option<Vec<DetailedFertilizerRecord>>,
        raw: Vec<ClassifiedRecord>,
    ) -> Self {
        match detailed {
            Some(rows) if !rows.is_empty() => FertilizerInput::Detailed(rows),
            _ => FertilizerInput::Raw(raw),
        }
    }

    /// Which input shape fed the series, for logging.
    pub fn source(&self) -> &'static str {
        match self {
            FertilizerInput::Detailed(_) => "detail_rows",
            FertilizerInput::Raw(_) => "raw_records",
        }
    }
}

/// One fertilizer series point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FertilizerEntry {
    pub date: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub soil_changed: SoilChange,
    pub crop_label: Option<String>,
    /// Records folded into this entry (always 1 for detail rows)
    pub record_count: u32,
}

#[derive(Default)]
struct DayTotal {
    quantity: f64,
    count: u32,
}

pub fn aggregate_fertilizer(input: &FertilizerInput) -> Vec<FertilizerEntry> {
    let entries = match input {
        FertilizerInput::Detailed(rows) => from_detailed(rows),
        FertilizerInput::Raw(records) => from_comments(records),
    };
    tracing::debug!(
        entries = entries.len(),
        detailed = matches!(input, FertilizerInput::Detailed(_)),
        "Fertilizer series computed"
    );
    entries
}

fn from_detailed(rows: &[DetailedFertilizerRecord]) -> Vec<FertilizerEntry> {
    let mut dated: Vec<_> = rows
        .iter()
        .map(|row| (row.timestamp.as_deref().and_then(parse_timestamp), row))
        .collect();
    dated.sort_by(|a, b| newest_first(a.0, b.0));

    dated
        .into_iter()
        .map(|(at, row)| FertilizerEntry {
            date: at.map(format_day),
            quantity: safe_number(row.quantity.as_ref()),
            unit: clean_text(row.unit.as_deref())
                .unwrap_or_else(|| DEFAULT_FERTILIZER_UNIT.to_string()),
            soil_changed: row.soil_changed,
            crop_label: clean_text(row.crop_label.as_deref()),
            record_count: 1,
        })
        .collect()
}

fn from_comments(records: &[ClassifiedRecord]) -> Vec<FertilizerEntry> {
    let mut buckets: DayBuckets<DayTotal> = DayBuckets::new();

    for record in records {
        let Payload::Fertilizing {
            quantity,
            unit,
            note,
            ..
        } = &record.payload
        else {
            continue;
        };
        let total = buckets.entry(record.day());
        total.quantity += comment_quantity_kg(*quantity, unit.as_deref(), note.as_deref());
        total.count += 1;
    }

    buckets
        .into_newest_first()
        .into_iter()
        .map(|(date, total)| FertilizerEntry {
            date,
            quantity: total.quantity,
            unit: DEFAULT_FERTILIZER_UNIT.to_string(),
            soil_changed: SoilChange::Unspecified,
            crop_label: None,
            record_count: total.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::numeric::RawNumber;
    use chrono::{TimeZone, Utc};

    fn comment(day: u32, quantity: Option<f64>, note: Option<&str>) -> ClassifiedRecord {
        ClassifiedRecord {
            id: format!("f{}", day),
            garden_id: "g1".to_string(),
            at: Utc.with_ymd_and_hms(2024, 4, day, 10, 0, 0).single(),
            payload: Payload::Fertilizing {
                quantity,
                unit: None,
                soil_changed: SoilChange::Unspecified,
                note: note.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_extract_mass() {
        assert_eq!(extract_mass_kg("Aplicado 3kg de compost"), Some(3.0));
        assert_eq!(extract_mass_kg("2,5 KILOS de humus"), Some(2.5));
        assert_eq!(extract_mass_kg("500 gramos"), Some(0.5));
        assert_eq!(extract_mass_kg("250g of bone meal"), Some(0.25));
        assert_eq!(extract_mass_kg("abono aplicado"), None);
        assert_eq!(extract_mass_kg("3 macetas"), None);
    }

    #[test]
    fn test_comment_quantity_fallback_chain() {
        assert_eq!(comment_quantity_kg(Some(1.5), None, Some("9kg")), 1.5);
        assert_eq!(comment_quantity_kg(Some(750.0), Some("g"), None), 0.75);
        assert_eq!(comment_quantity_kg(None, None, Some("Aplicado 3kg de compost")), 3.0);
        assert_eq!(
            comment_quantity_kg(None, None, Some("abono aplicado")),
            DEFAULT_FERTILIZER_KG
        );
        assert_eq!(comment_quantity_kg(None, None, None), DEFAULT_FERTILIZER_KG);
    }

    #[test]
    fn test_raw_comments_grouped_per_day() {
        let mut same_day = comment(2, None, Some("abono aplicado"));
        same_day.id = "f2b".to_string();
        let records = vec![
            comment(2, None, Some("Aplicado 3kg de compost")),
            comment(9, Some(1.0), None),
            same_day,
        ];

        let series = aggregate_fertilizer(&FertilizerInput::Raw(records));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date.as_deref(), Some("2024-04-09"));
        assert_eq!(series[0].quantity, 1.0);
        assert_eq!(series[0].record_count, 1);
        assert_eq!(series[1].date.as_deref(), Some("2024-04-02"));
        assert_eq!(series[1].quantity, 5.0);
        assert_eq!(series[1].record_count, 2);
        assert_eq!(series[1].unit, "kg");
    }

    #[test]
    fn test_detailed_rows_pass_through() {
        let rows = vec![
            DetailedFertilizerRecord {
                id: "d1".to_string(),
                timestamp: Some("2024-04-01".to_string()),
                quantity: Some(RawNumber::from("oops")),
                soil_changed: SoilChange::Full,
                crop_label: Some("tomato".to_string()),
                ..Default::default()
            },
            DetailedFertilizerRecord {
                id: "d2".to_string(),
                timestamp: Some("2024-04-03".to_string()),
                quantity: Some(RawNumber::Number(0.4)),
                unit: Some("g".to_string()),
                ..Default::default()
            },
        ];

        let series = aggregate_fertilizer(&FertilizerInput::Detailed(rows));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date.as_deref(), Some("2024-04-03"));
        assert_eq!(series[0].unit, "g");
        assert_eq!(series[0].quantity, 0.4);
        assert_eq!(series[1].unit, "kg");
        assert_eq!(series[1].quantity, 0.0);
        assert_eq!(series[1].soil_changed, SoilChange::Full);
        assert_eq!(series[1].crop_label.as_deref(), Some("tomato"));
    }

    #[test]
    fn test_select_prefers_detailed() {
        let raw = vec![comment(1, None, None)];
        let detailed = vec![DetailedFertilizerRecord::default()];

        assert!(matches!(
            FertilizerInput::select(Some(detailed), raw.clone()),
            FertilizerInput::Detailed(_)
        ));
        assert!(matches!(
            FertilizerInput::select(Some(vec![]), raw.clone()),
            FertilizerInput::Raw(_)
        ));
        assert!(matches!(
            FertilizerInput::select(None, raw.clone()),
            FertilizerInput::Raw(_)
        ));
        assert_eq!(FertilizerInput::select(None, raw).source(), "raw_records");
        assert_eq!(
            FertilizerInput::select(Some(vec![DetailedFertilizerRecord::default()]), vec![])
                .source(),
            "detail_rows"
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(aggregate_fertilizer(&FertilizerInput::Raw(vec![])).is_empty());
        assert!(aggregate_fertilizer(&FertilizerInput::Detailed(vec![])).is_empty());
    }
}
