// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Maintenance aggregator: one entry per day with the notes logged that day.

use crate::stats::classify::{ClassifiedRecord, Payload};
use crate::stats::DayBuckets;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MaintenanceEntry {
    pub date: Option<String>,
    pub count: u32,
    pub notes: Vec<String>,
}

#[derive(Default)]
struct DayLog {
    count: u32,
    notes: Vec<String>,
}

pub fn aggregate_maintenance(records: &[ClassifiedRecord]) -> Vec<MaintenanceEntry> {
    let mut buckets: DayBuckets<DayLog> = DayBuckets::new();

    for record in records {
        let Payload::Maintenance { note } = &record.payload else {
            continue;
        };
        let log = buckets.entry(record.day());
        log.count += 1;
        if let Some(note) = note {
            log.notes.push(note.clone());
        }
    }

    buckets
        .into_newest_first()
        .into_iter()
        .map(|(date, log)| MaintenanceEntry {
            date,
            count: log.count,
            notes: log.notes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(day: Option<u32>, note: Option<&str>) -> ClassifiedRecord {
        ClassifiedRecord {
            id: "m".to_string(),
            garden_id: "g1".to_string(),
            at: day.and_then(|d| Utc.with_ymd_and_hms(2024, 7, d, 8, 0, 0).single()),
            payload: Payload::Maintenance {
                note: note.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_grouped_with_notes_in_order() {
        let records = vec![
            task(Some(1), Some("cleaned drip line")),
            task(Some(4), None),
            task(Some(1), Some("replaced pump filter")),
            task(None, Some("undated")),
        ];

        let series = aggregate_maintenance(&records);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date.as_deref(), Some("2024-07-04"));
        assert!(series[0].notes.is_empty());
        assert_eq!(series[1].count, 2);
        assert_eq!(
            series[1].notes,
            vec!["cleaned drip line".to_string(), "replaced pump filter".to_string()]
        );
        assert_eq!(series[2].date, None);
    }

    #[test]
    fn test_empty() {
        assert!(aggregate_maintenance(&[]).is_empty());
    }
}
