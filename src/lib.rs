// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Vgarden-Tracker: activity statistics for vertical urban gardens
//!
//! This crate provides the backend API that records garden activities
//! (watering, planting, harvests, fertilizing, pests, maintenance) and turns
//! them into per-garden, per-user and system-wide statistics.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod stats;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{ActivityLogService, StatisticsService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub stats_service: StatisticsService,
    pub activity_log: ActivityLogService,
}

impl AppState {
    /// Wire the services around a store handle.
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        Self {
            stats_service: StatisticsService::new(db.clone(), config.stats),
            activity_log: ActivityLogService::new(db.clone()),
            config,
            db,
        }
    }
}
