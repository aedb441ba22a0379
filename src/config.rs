// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::stats::HarvestMatchPolicy;
use std::env;
use std::str::FromStr;

/// Largest top-N ranking the API will compute.
pub const MAX_TOP_GARDENS: usize = 50;
/// Largest recent-activity window the API will return.
pub const MAX_RECENT_ACTIVITY: usize = 100;
/// Longest look-back for the system activity trend (about ten years).
pub const MAX_TREND_WINDOW_DAYS: i64 = 3650;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (allowed CORS origin)
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Statistics engine settings
    pub stats: StatsSettings,
}

/// Tunables for the statistics endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSettings {
    /// Default N for the top-gardens ranking
    pub top_gardens: usize,
    /// Default cap for recent-activity feeds
    pub recent_activity_limit: usize,
    /// How many days back the system activity trend looks
    pub trend_window_days: i64,
    /// Resolution of duplicate harvests against one planting
    pub harvest_policy: HarvestMatchPolicy,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            top_gardens: 5,
            recent_activity_limit: 10,
            trend_window_days: 30,
            harvest_policy: HarvestMatchPolicy::First,
        }
    }
}

impl StatsSettings {
    /// Read overrides from `STATS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            top_gardens: bounded(
                "STATS_TOP_GARDENS",
                defaults.top_gardens,
                1,
                MAX_TOP_GARDENS,
            )?,
            recent_activity_limit: bounded(
                "STATS_RECENT_ACTIVITY_LIMIT",
                defaults.recent_activity_limit,
                1,
                MAX_RECENT_ACTIVITY,
            )?,
            trend_window_days: bounded(
                "STATS_TREND_WINDOW_DAYS",
                defaults.trend_window_days,
                1,
                MAX_TREND_WINDOW_DAYS,
            )?,
            harvest_policy: parsed("STATS_HARVEST_POLICY", defaults.harvest_policy)?,
        })
    }
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

fn bounded<T>(name: &'static str, default: T, min: T, max: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + ToString,
{
    let value: T = parsed(name, default)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid(name, value.to_string()))
    }
}

impl Config {
    /// Deterministic config for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            stats: StatsSettings::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            stats: StatsSettings::from_env()?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
