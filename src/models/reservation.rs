// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation model: a receiver's claim on a food listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Reservation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled
        )
    }

    /// Whether a reservation may move from `self` to a *different* status.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed | Completed | Cancelled) | (Confirmed, Completed | Cancelled)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Reservation {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub food_id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub receiver_id: u64,
    pub status: ReservationStatus,
    /// Set when the reservation reaches `completed`
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reservation record before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub food_id: u64,
    pub receiver_id: u64,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewReservation {
    pub fn pending(food_id: u64, receiver_id: u64, now: DateTime<Utc>) -> Self {
        Self {
            food_id,
            receiver_id,
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(self, id: u64) -> Reservation {
        Reservation {
            id,
            food_id: self.food_id,
            receiver_id: self.receiver_id,
            status: self.status,
            completed_at: (self.status == ReservationStatus::Completed).then_some(self.created_at),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Reservation {
    /// Move to `status`, stamping `updated_at` (and `completed_at` on completion).
    pub fn set_status(&mut self, status: ReservationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
        if status == ReservationStatus::Completed {
            self.completed_at = Some(now);
        }
    }
}
