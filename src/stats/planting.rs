// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Planting/harvest aggregation.
//!
//! Each planting is paired with the harvest that references it through
//! `linked_planting_id`. Plantings without a harvest report `harvested = 0`.
//! Harvests that reference no known planting are counted but not emitted.

use crate::stats::classify::{ClassifiedRecord, Payload};
use crate::stats::newest_first;
use crate::time_utils::format_day;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How several harvests referencing the same planting are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarvestMatchPolicy {
    /// The first harvest in record order wins; later ones are ignored.
    #[default]
    First,
    /// The last harvest in record order replaces earlier ones.
    Last,
    /// Quantities are summed; the harvest date is the latest one.
    Sum,
}

impl FromStr for HarvestMatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(HarvestMatchPolicy::First),
            "last" => Ok(HarvestMatchPolicy::Last),
            "sum" => Ok(HarvestMatchPolicy::Sum),
            other => Err(format!("unknown harvest policy '{}'", other)),
        }
    }
}

/// A planting combined with its matched harvest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlantingEntry {
    pub planting_id: String,
    pub date: Option<String>,
    pub sown: f64,
    pub harvested: f64,
    pub harvest_date: Option<String>,
    pub crop_label: Option<String>,
    /// Planting instant, kept for ordering
    #[serde(skip)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub planted_at: Option<DateTime<Utc>>,
}

/// Result of matching plantings with harvests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// One entry per planting, in record order
    pub entries: Vec<PlantingEntry>,
    /// Harvests with no (known) planting
    pub orphan_harvests: usize,
    /// Harvests referencing a planting that already had one
    pub duplicate_harvests: usize,
}

#[derive(Debug, Clone)]
struct HarvestMatch<'a> {
    harvested: f64,
    at: Option<DateTime<Utc>>,
    label: Option<&'a str>,
}

/// Pair plantings with harvests under the given policy.
pub fn match_plantings(records: &[ClassifiedRecord], policy: HarvestMatchPolicy) -> MatchOutcome {
    let planting_ids: HashSet<&str> = records
        .iter()
        .filter(|r| matches!(r.payload, Payload::Planting { .. }))
        .map(|r| r.id.as_str())
        .collect();

    let mut matches: HashMap<&str, HarvestMatch> = HashMap::new();
    let mut orphan_harvests = 0;
    let mut duplicate_harvests = 0;

    for record in records {
        let Payload::Harvest {
            harvested,
            linked_planting_id,
            label,
        } = &record.payload
        else {
            continue;
        };

        let Some(linked) = linked_planting_id
            .as_deref()
            .filter(|id| planting_ids.contains(id))
        else {
            orphan_harvests += 1;
            continue;
        };

        let candidate = HarvestMatch {
            harvested: *harvested,
            at: record.at,
            label: label.as_deref(),
        };

        match matches.get_mut(linked) {
            None => {
                matches.insert(linked, candidate);
            }
            Some(existing) => {
                duplicate_harvests += 1;
                match policy {
                    HarvestMatchPolicy::First => {}
                    HarvestMatchPolicy::Last => *existing = candidate,
                    HarvestMatchPolicy::Sum => {
                        existing.harvested += candidate.harvested;
                        existing.at = existing.at.max(candidate.at);
                        existing.label = existing.label.or(candidate.label);
                    }
                }
            }
        }
    }

    let entries: Vec<PlantingEntry> = records
        .iter()
        .filter_map(|record| {
            let Payload::Planting { sown, label } = &record.payload else {
                return None;
            };
            let harvest = matches.get(record.id.as_str());
            Some(PlantingEntry {
                planting_id: record.id.clone(),
                date: record.day(),
                sown: *sown,
                harvested: harvest.map(|h| h.harvested).unwrap_or(0.0),
                harvest_date: harvest.and_then(|h| h.at).map(format_day),
                crop_label: label
                    .clone()
                    .or_else(|| harvest.and_then(|h| h.label).map(str::to_string)),
                planted_at: record.at,
            })
        })
        .collect();

    if orphan_harvests > 0 || duplicate_harvests > 0 {
        tracing::warn!(
            orphan_harvests,
            duplicate_harvests,
            policy = ?policy,
            "Harvests not paired one-to-one with plantings"
        );
    }

    MatchOutcome {
        entries,
        orphan_harvests,
        duplicate_harvests,
    }
}

/// Combined planting/harvest series for display, newest planting first.
pub fn aggregate_plantings(
    records: &[ClassifiedRecord],
    policy: HarvestMatchPolicy,
) -> Vec<PlantingEntry> {
    let mut entries = match_plantings(records, policy).entries;
    entries.sort_by(|a, b| newest_first(a.planted_at, b.planted_at));
    tracing::debug!(entries = entries.len(), "Planting series computed");
    entries
}
