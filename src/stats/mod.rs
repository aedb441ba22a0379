// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garden activity statistics engine.
//!
//! Pure, synchronous transforms from a garden's activity records to the
//! series shown on dashboards:
//! 1. Classify raw records into kinds with normalized payloads
//! 2. Run the per-kind aggregators (water, planting/harvest, fertilizer,
//!    pest, maintenance)
//! 3. Derive growth metrics from the planting series
//! 4. Roll everything up per garden, per user or system-wide
//!
//! Nothing here performs I/O or holds state between calls.

pub mod classify;
pub mod fertilizer;
pub mod growth;
pub mod maintenance;
pub mod numeric;
pub mod pest;
pub mod planting;
pub mod rollup;
pub mod summary;
pub mod water;

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub use classify::{classify, classify_all, ActivityKind, ClassifiedRecord, Payload};
pub use fertilizer::{FertilizerEntry, FertilizerInput, DEFAULT_FERTILIZER_KG};
pub use growth::{GrowthEntry, GROWTH_RATE_DECIMALS};
pub use maintenance::MaintenanceEntry;
pub use pest::{PestEntry, PestInput};
pub use planting::{HarvestMatchPolicy, MatchOutcome, PlantingEntry};
pub use rollup::{SystemStatistics, TrendBucket, UserStatistics};
pub use summary::{GardenStatistics, GardenStatsInput, GardenSummary};
pub use water::WaterEntry;

/// Placeholder for categorical fields the source did not record.
pub const UNSPECIFIED: &str = "unspecified";

/// Errors for series the engine could not obtain.
///
/// These never fail a whole response: the roller replaces the series with an
/// empty one and logs a warning.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("series `{series}` unavailable: {reason}")]
    SeriesUnavailable { series: &'static str, reason: String },
}

/// A series input that may have failed upstream.
pub type Series<T> = Result<Vec<T>, StatsError>;

/// Unwrap a series, degrading failures to an empty list.
pub(crate) fn series_or_empty<T>(series: Series<T>) -> Vec<T> {
    match series {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Series degraded to empty");
            Vec::new()
        }
    }
}

/// Newest first; undated entries sort last.
pub(crate) fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Oldest first; undated entries sort first.
pub(crate) fn oldest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    a.cmp(&b)
}

/// Per-day accumulator used by the grouping aggregators.
pub(crate) struct DayBuckets<A> {
    dated: BTreeMap<String, A>,
    undated: Option<A>,
}

impl<A: Default> DayBuckets<A> {
    pub(crate) fn new() -> Self {
        Self {
            dated: BTreeMap::new(),
            undated: None,
        }
    }

    pub(crate) fn entry(&mut self, day: Option<String>) -> &mut A {
        match day {
            Some(day) => self.dated.entry(day).or_default(),
            None => self.undated.get_or_insert_with(A::default),
        }
    }

    /// Drain buckets newest day first, with the undated bucket last.
    pub(crate) fn into_newest_first(self) -> Vec<(Option<String>, A)> {
        let mut out: Vec<(Option<String>, A)> = self
            .dated
            .into_iter()
            .rev()
            .map(|(day, acc)| (Some(day), acc))
            .collect();
        if let Some(acc) = self.undated {
            out.push((None, acc));
        }
        out
    }
}

/// Trim a text field, mapping blanks to `None`.
pub(crate) fn clean_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
