// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garden model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A vertical garden as stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garden {
    /// Garden ID (also used as document ID)
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Owning user ID
    #[serde(default)]
    pub owner_id: String,
    /// Free-form location (building, rooftop, ...)
    #[serde(default)]
    pub location: Option<String>,
    /// When the garden was registered (ISO 8601)
    #[serde(default)]
    pub created_at: String,
}

/// Garden identity as embedded in statistics responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GardenInfo {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub location: Option<String>,
}

impl From<&Garden> for GardenInfo {
    fn from(garden: &Garden) -> Self {
        Self {
            id: garden.id.clone(),
            name: garden.name.clone(),
            owner_id: garden.owner_id.clone(),
            location: garden.location.clone(),
        }
    }
}
