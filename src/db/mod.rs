// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const GARDENS: &str = "gardens";
    pub const ACTIVITY_RECORDS: &str = "activity_records";
    /// Per-garden totals aggregates (keyed by garden_id)
    pub const GARDEN_TOTALS: &str = "garden_totals";
    /// Pre-joined fertilizer rows, when the logging front-end provides them
    pub const FERTILIZER_DETAILS: &str = "fertilizer_details";
    /// Pre-joined pest sighting rows
    pub const PEST_DETAILS: &str = "pest_details";
}
