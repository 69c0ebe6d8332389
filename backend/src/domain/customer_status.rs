//! Lifecycle status of a customer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Customer lifecycle status with stable numeric identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    /// Prospect that has not bought anything yet.
    Lead,
    /// Customer with an active relationship.
    Active,
    /// Former customer.
    Retired,
}

impl CustomerStatus {
    const ALL: [Self; 3] = [Self::Lead, Self::Active, Self::Retired];

    /// Every known status, ordered by identifier.
    #[must_use]
    pub const fn get_all() -> &'static [Self] {
        &Self::ALL
    }

    /// Stable numeric identifier.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Lead => 1,
            Self::Active => 2,
            Self::Retired => 3,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Active => "Active",
            Self::Retired => "Retired",
        }
    }

    /// Look up a status by identifier.
    #[must_use]
    pub fn from_id(id: i32) -> Option<Self> {
        Self::get_all().iter().copied().find(|status| status.id() == id)
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
