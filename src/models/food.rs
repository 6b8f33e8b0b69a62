// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food listing model and its status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Listing status.
///
/// `available -> reserved -> donated`, with `expired` reachable from any
/// non-terminal state and `reserved -> available` as the rollback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FoodStatus {
    #[default]
    Available,
    Reserved,
    Donated,
    Expired,
}

impl FoodStatus {
    pub const ALL: [FoodStatus; 4] = [
        FoodStatus::Available,
        FoodStatus::Reserved,
        FoodStatus::Donated,
        FoodStatus::Expired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FoodStatus::Available => "available",
            FoodStatus::Reserved => "reserved",
            FoodStatus::Donated => "donated",
            FoodStatus::Expired => "expired",
        }
    }

    /// Whether a listing may move from `self` to `next`.
    ///
    /// Staying in the same status is always allowed.
    pub fn can_transition_to(self, next: FoodStatus) -> bool {
        use FoodStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Available, Reserved | Donated | Expired)
                | (Reserved, Available | Donated | Expired)
                | (Donated, Expired)
        )
    }
}

impl fmt::Display for FoodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoodStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FoodStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown food status '{}'", s))
    }
}

/// Donation listing held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Food {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Owning donor (user id)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub donor_id: u64,
    pub name: String,
    pub description: Option<String>,
    /// Free-form category (vegetables, bakery, dairy, ...)
    pub category: String,
    /// Free-form amount, e.g. "10 kg" or "50 units"
    pub quantity: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub location: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub image_url: Option<String>,
    pub status: FoodStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Food record before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewFood {
    pub donor_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub quantity: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub location: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub image_url: Option<String>,
    pub status: FoodStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewFood {
    pub fn with_id(self, id: u64) -> Food {
        Food {
            id,
            donor_id: self.donor_id,
            name: self.name,
            description: self.description,
            category: self.category,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self.image_url,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Listing fields supplied by a donor; the façade fills in the rest.
#[derive(Debug, Clone, Default)]
pub struct CreateFood {
    pub donor_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub quantity: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub location: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<FoodStatus>,
}

/// AND-combined listing filters. `None` (or an empty category) matches all.
#[derive(Debug, Clone, Default)]
pub struct FoodFilter {
    pub category: Option<String>,
    pub status: Option<FoodStatus>,
    pub donor_id: Option<u64>,
}

impl FoodFilter {
    pub fn with_status(status: FoodStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_donor(donor_id: u64) -> Self {
        Self {
            donor_id: Some(donor_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, food: &Food) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if food.category != category {
                return false;
            }
        }
        if self.status.is_some_and(|status| food.status != status) {
            return false;
        }
        if self.donor_id.is_some_and(|donor_id| food.donor_id != donor_id) {
            return false;
        }
        true
    }
}
