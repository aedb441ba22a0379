// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod garden;
pub mod record;
pub mod totals;
pub mod user;

pub use garden::{Garden, GardenInfo};
pub use record::{ActivityRecord, DetailedFertilizerRecord, DetailedPestRecord, SoilChange};
pub use totals::BasicTotals;
pub use user::Role;
