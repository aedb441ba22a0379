// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record classification.
//!
//! Turns a stored [`ActivityRecord`] into a kind plus the payload relevant to
//! that kind. Classification never fails: missing numbers become `0`,
//! missing text becomes `None`, unknown kinds become [`ActivityKind::General`].

use crate::models::record::{ActivityRecord, SoilChange};
use crate::stats::numeric::{non_negative, safe_number};
use crate::stats::{clean_text, water, UNSPECIFIED};
use crate::time_utils::{format_day, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of a garden activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityKind {
    Watering,
    Planting,
    Harvest,
    Fertilizing,
    Pest,
    Maintenance,
    General,
}

impl ActivityKind {
    /// Map a declared kind to an [`ActivityKind`].
    ///
    /// Matching is case-insensitive and accepts the Spanish labels used by
    /// the logging front-end.
    pub fn from_declared(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "watering" | "water" | "riego" => ActivityKind::Watering,
            "planting" | "siembra" | "plantacion" | "plantación" => ActivityKind::Planting,
            "harvest" | "harvesting" | "cosecha" => ActivityKind::Harvest,
            "fertilizing" | "fertilizer" | "abono" | "fertilizacion" | "fertilización" => {
                ActivityKind::Fertilizing
            }
            "pest" | "pests" | "plaga" | "plagas" => ActivityKind::Pest,
            "maintenance" | "mantenimiento" => ActivityKind::Maintenance,
            _ => ActivityKind::General,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Watering => "watering",
            ActivityKind::Planting => "planting",
            ActivityKind::Harvest => "harvest",
            ActivityKind::Fertilizing => "fertilizing",
            ActivityKind::Pest => "pest",
            ActivityKind::Maintenance => "maintenance",
            ActivityKind::General => "general",
        }
    }
}

/// Kind-specific normalized payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Watering {
        liters: f64,
        planting_label: Option<String>,
    },
    Planting {
        sown: f64,
        label: Option<String>,
    },
    Harvest {
        harvested: f64,
        linked_planting_id: Option<String>,
        label: Option<String>,
    },
    Fertilizing {
        /// Structured quantity, only when the record carried a parseable one
        quantity: Option<f64>,
        unit: Option<String>,
        soil_changed: SoilChange,
        note: Option<String>,
    },
    Pest {
        count: f64,
        species: String,
        severity: String,
    },
    Maintenance {
        note: Option<String>,
    },
    General,
}

/// A record after classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub id: String,
    pub garden_id: String,
    /// Full instant, used for ordering
    pub at: Option<DateTime<Utc>>,
    pub payload: Payload,
}

impl ClassifiedRecord {
    pub fn kind(&self) -> ActivityKind {
        match self.payload {
            Payload::Watering { .. } => ActivityKind::Watering,
            Payload::Planting { .. } => ActivityKind::Planting,
            Payload::Harvest { .. } => ActivityKind::Harvest,
            Payload::Fertilizing { .. } => ActivityKind::Fertilizing,
            Payload::Pest { .. } => ActivityKind::Pest,
            Payload::Maintenance { .. } => ActivityKind::Maintenance,
            Payload::General => ActivityKind::General,
        }
    }

    /// `YYYY-MM-DD` day key, used for grouping.
    pub fn day(&self) -> Option<String> {
        self.at.map(format_day)
    }
}

/// Classify a single record.
pub fn classify(record: &ActivityRecord) -> ClassifiedRecord {
    let kind = ActivityKind::from_declared(&record.kind);
    let quantity = safe_number(record.quantity.as_ref());
    let label = clean_text(record.planting_label.as_deref());

    let payload = match kind {
        ActivityKind::Watering => Payload::Watering {
            liters: water::to_liters(quantity, record.unit.as_deref()),
            planting_label: label,
        },
        ActivityKind::Planting => Payload::Planting {
            sown: quantity,
            label,
        },
        ActivityKind::Harvest => Payload::Harvest {
            harvested: quantity,
            linked_planting_id: clean_text(record.linked_planting_id.as_deref()),
            label,
        },
        ActivityKind::Fertilizing => Payload::Fertilizing {
            quantity: record
                .quantity
                .as_ref()
                .and_then(|q| q.parsed())
                .map(non_negative),
            unit: clean_text(record.unit.as_deref()),
            soil_changed: record.soil_changed,
            note: clean_text(record.free_text.as_deref()),
        },
        ActivityKind::Pest => Payload::Pest {
            count: quantity,
            species: clean_text(record.pest_species.as_deref())
                .unwrap_or_else(|| UNSPECIFIED.to_string()),
            severity: clean_text(record.pest_severity.as_deref())
                .unwrap_or_else(|| UNSPECIFIED.to_string()),
        },
        ActivityKind::Maintenance => Payload::Maintenance {
            note: clean_text(record.free_text.as_deref()),
        },
        ActivityKind::General => Payload::General,
    };

    ClassifiedRecord {
        id: record.id.clone(),
        garden_id: record.garden_id.clone(),
        at: record.timestamp.as_deref().and_then(parse_timestamp),
        payload,
    }
}

/// Classify a batch, preserving input order.
pub fn classify_all(records: &[ActivityRecord]) -> Vec<ClassifiedRecord> {
    records.iter().map(classify).collect()
}
