// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pest aggregator.

use crate::models::record::DetailedPestRecord;
use crate::stats::classify::{ClassifiedRecord, Payload};
use crate::stats::numeric::safe_number;
use crate::stats::{clean_text, newest_first, DayBuckets, UNSPECIFIED};
use crate::time_utils::{format_day, parse_timestamp};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The two pest input shapes.
#[derive(Debug, Clone)]
pub enum PestInput {
    Detailed(Vec<DetailedPestRecord>),
    Raw(Vec<ClassifiedRecord>),
}

impl PestInput {
    /// Prefer detail rows when any were supplied.
    pub fn select(detailed: Option<Vec<DetailedPestRecord>>, raw: Vec<ClassifiedRecord>) -> Self {
        match detailed {
            Some(rows) if !rows.is_empty() => PestInput::Detailed(rows),
            _ => PestInput::Raw(raw),
        }
    }

    /// Which input shape fed the series, for logging.
    pub fn source(&self) -> &'static str {
        match self {
            PestInput::Detailed(_) => "detail_rows",
            PestInput::Raw(_) => "raw_records",
        }
    }
}

/// One pest series point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PestEntry {
    pub date: Option<String>,
    pub species: String,
    pub severity: String,
    pub incidences: u32,
    pub pest_count: f64,
}

/// A sighting with no recorded count still means at least one pest.
pub(crate) fn sighting_count(count: f64) -> f64 {
    if count > 0.0 {
        count
    } else {
        1.0
    }
}

#[derive(Default)]
struct DayTally {
    incidences: u32,
    pests: f64,
}

pub fn aggregate_pests(input: &PestInput) -> Vec<PestEntry> {
    let entries = match input {
        PestInput::Detailed(rows) => from_detailed(rows),
        PestInput::Raw(records) => from_comments(records),
    };
    tracing::debug!(entries = entries.len(), "Pest series computed");
    entries
}

fn from_detailed(rows: &[DetailedPestRecord]) -> Vec<PestEntry> {
    let mut dated: Vec<_> = rows
        .iter()
        .map(|row| (row.timestamp.as_deref().and_then(parse_timestamp), row))
        .collect();
    dated.sort_by(|a, b| newest_first(a.0, b.0));

    dated
        .into_iter()
        .map(|(at, row)| PestEntry {
            date: at.map(format_day),
            species: clean_text(row.pest_species.as_deref())
                .unwrap_or_else(|| UNSPECIFIED.to_string()),
            severity: clean_text(row.pest_severity.as_deref())
                .unwrap_or_else(|| UNSPECIFIED.to_string()),
            incidences: 1,
            pest_count: sighting_count(safe_number(row.quantity.as_ref())),
        })
        .collect()
}

fn from_comments(records: &[ClassifiedRecord]) -> Vec<PestEntry> {
    let mut buckets: DayBuckets<DayTally> = DayBuckets::new();

    for record in records {
        let Payload::Pest { count, .. } = &record.payload else {
            continue;
        };
        let tally = buckets.entry(record.day());
        tally.incidences += 1;
        tally.pests += sighting_count(*count);
    }

    buckets
        .into_newest_first()
        .into_iter()
        .map(|(date, tally)| PestEntry {
            date,
            species: UNSPECIFIED.to_string(),
            severity: UNSPECIFIED.to_string(),
            incidences: tally.incidences,
            pest_count: tally.pests,
        })
        .collect()
}
