// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity record models for storage.
//!
//! Records are written by several front-ends over the years, so every field
//! is optional on decode and numeric fields accept numbers or strings. The
//! statistics engine never trusts these shapes directly; it goes through the
//! classifier in [`crate::stats::classify`].

use crate::stats::numeric::RawNumber;
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One logged garden event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Record ID (also used as document ID)
    #[serde(default)]
    pub id: String,
    /// Owning garden
    #[serde(default)]
    pub garden_id: String,
    /// Declared kind ("watering", "riego", ...)
    #[serde(default)]
    pub kind: String,
    /// When the event happened (ISO 8601 or `YYYY-MM-DD`)
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Kind-dependent quantity
    #[serde(default)]
    pub quantity: Option<RawNumber>,
    /// Unit of `quantity` as recorded
    #[serde(default)]
    pub unit: Option<String>,
    /// Harvest only: planting this harvest completes
    #[serde(default)]
    pub linked_planting_id: Option<String>,
    /// Crop name
    #[serde(default)]
    pub planting_label: Option<String>,
    /// Fertilizing only
    #[serde(default)]
    pub soil_changed: SoilChange,
    /// Pest only
    #[serde(default)]
    pub pest_species: Option<String>,
    /// Pest only
    #[serde(default)]
    pub pest_severity: Option<String>,
    /// Unstructured note
    #[serde(default)]
    pub free_text: Option<String>,
}

/// Whether a fertilizing event replaced the substrate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SoilChange {
    /// Full substrate replacement
    Full,
    /// Top-dressing only
    TopDressing,
    #[default]
    Unspecified,
}

impl SoilChange {
    /// Interpret a stored flag. Booleans, 0/1 and a handful of words are
    /// recognized; everything else is unspecified.
    pub fn from_value(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Bool(true) => SoilChange::Full,
            Value::Bool(false) => SoilChange::TopDressing,
            Value::Number(n) => match n.as_i64() {
                Some(1) => SoilChange::Full,
                Some(0) => SoilChange::TopDressing,
                _ => SoilChange::Unspecified,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "full" | "true" | "1" | "si" | "sí" | "yes" | "replacement" => SoilChange::Full,
                "top_dressing" | "top" | "false" | "0" | "no" => SoilChange::TopDressing,
                _ => SoilChange::Unspecified,
            },
            _ => SoilChange::Unspecified,
        }
    }
}

impl<'de> Deserialize<'de> for SoilChange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(SoilChange::from_value(&value))
    }
}

/// Pre-joined fertilizer row (`fertilizer_details` collection).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedFertilizerRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub garden_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, alias = "cantidad_abono")]
    pub quantity: Option<RawNumber>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub soil_changed: SoilChange,
    #[serde(default)]
    pub crop_label: Option<String>,
}

/// Pre-joined pest sighting row (`pest_details` collection).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedPestRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub garden_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub pest_species: Option<String>,
    #[serde(default)]
    pub pest_severity: Option<String>,
    #[serde(default)]
    pub quantity: Option<RawNumber>,
    #[serde(default)]
    pub crop_label: Option<String>,
}
