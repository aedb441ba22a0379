// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Safe numeric parsing shared by every aggregator.
//!
//! Store rows carry numbers as JSON numbers, numeric strings ("2.5", "2,5"),
//! or garbage. Everything funnels through [`safe_number`] so that NaN,
//! infinities, negatives and unparseable input all collapse to `0.0` the
//! same way in every series.

use serde::{Deserialize, Deserializer, Serialize};

/// A numeric field as it arrives from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

impl RawNumber {
    /// The parsed value, if the field holds anything numeric at all.
    pub fn parsed(&self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(*n),
            RawNumber::Text(s) => parse_decimal(s),
            RawNumber::Other(_) => None,
        }
        .filter(|n| n.is_finite())
    }
}

/// Parse a decimal string, accepting a comma as decimal separator.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replace(',', ".").parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Parse-or-zero. Never negative, never NaN.
pub fn safe_number(raw: Option<&RawNumber>) -> f64 {
    raw.and_then(RawNumber::parsed).map(non_negative).unwrap_or(0.0)
}

/// Clamp a computed value into the non-negative finite range.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// `deserialize_with` helper for stored aggregate fields.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(safe_number(raw.as_ref()))
}

/// `deserialize_with` helper for stored counters.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(value.trunc().min(u32::MAX as f64) as u32)
}
