// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user gamification ledger.
//!
//! One record per user. Counters only grow through [`CreditAward`]s:
//! each donation is worth 10 credits and 10 impact points, each completed
//! reservation 5 and 5.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Credit ledger for a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserCredit {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub credits: u32,
    pub foods_donated: u32,
    pub foods_received: u32,
    /// Weighted sum of donations and receipts
    pub impact_score: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserCredit {
    /// A fresh, all-zero ledger.
    pub fn zeroed(id: u64, user_id: u64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            credits: 0,
            foods_donated: 0,
            foods_received: 0,
            impact_score: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an award as an increment of the current counters.
    pub fn apply(&mut self, award: CreditAward, now: DateTime<Utc>) {
        self.credits = self.credits.saturating_add(award.credits());
        self.impact_score = self.impact_score.saturating_add(award.impact());
        match award {
            CreditAward::Donation => self.foods_donated = self.foods_donated.saturating_add(1),
            CreditAward::Receipt => self.foods_received = self.foods_received.saturating_add(1),
        }
        self.updated_at = now;
    }

    /// Merge the supplied fields, leaving the others untouched.
    pub fn merge(&mut self, update: &CreditsUpdate, now: DateTime<Utc>) {
        if let Some(credits) = update.credits {
            self.credits = credits;
        }
        if let Some(foods_donated) = update.foods_donated {
            self.foods_donated = foods_donated;
        }
        if let Some(foods_received) = update.foods_received {
            self.foods_received = foods_received;
        }
        if let Some(impact_score) = update.impact_score {
            self.impact_score = impact_score;
        }
        self.updated_at = now;
    }
}

/// Partial ledger update (absolute values).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreditsUpdate {
    pub credits: Option<u32>,
    pub foods_donated: Option<u32>,
    pub foods_received: Option<u32>,
    pub impact_score: Option<u32>,
}

/// Events that earn credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditAward {
    /// Donor listed food
    Donation,
    /// Receiver completed a reservation
    Receipt,
}

impl CreditAward {
    pub const DONATION_CREDITS: u32 = 10;
    pub const RECEIPT_CREDITS: u32 = 5;

    pub fn credits(self) -> u32 {
        match self {
            CreditAward::Donation => Self::DONATION_CREDITS,
            CreditAward::Receipt => Self::RECEIPT_CREDITS,
        }
    }

    pub fn impact(self) -> u32 {
        // Impact mirrors credits one-to-one for both events.
        self.credits()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CreditAward::Donation => "donation",
            CreditAward::Receipt => "receipt",
        }
    }
}
