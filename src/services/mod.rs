// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity_log;
pub mod statistics;

pub use activity_log::{ActivityLogService, LogActivityRequest, LogActivityResponse};
pub use statistics::StatisticsService;
