// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User roles carried in session tokens.

use serde::{Deserialize, Serialize};

/// Application role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including system-wide statistics.
    Admin,
    /// Maintains gardens on behalf of residents; may read every garden.
    Technician,
    /// Garden owner; may only read their own gardens.
    Resident,
}

impl Role {
    /// Whether this role may read gardens it does not own.
    pub fn sees_all_gardens(self) -> bool {
        matches!(self, Role::Admin | Role::Technician)
    }
}
