// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credit ledger and leaderboard.

use crate::config::CreditLedgerPolicy;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CreditAward, Food, FoodFilter, FoodStatus, UserCredit};

/// Number of entries returned by the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

/// Awards credits and serves ledger reads.
#[derive(Clone)]
pub struct CreditService {
    db: Database,
    policy: CreditLedgerPolicy,
}

impl CreditService {
    pub fn new(db: Database, policy: CreditLedgerPolicy) -> Self {
        Self { db, policy }
    }

    /// Credit `user_id` for `award`.
    ///
    /// Returns the updated ledger, or `None` when the user has no ledger and
    /// the policy is [`CreditLedgerPolicy::Skip`].
    pub async fn award(&self, user_id: u64, award: CreditAward) -> Result<Option<UserCredit>> {
        let ledger = match self.policy {
            CreditLedgerPolicy::Initialize => {
                self.db
                    .initialize_and_award_user_credits(user_id, award)
                    .await?
            }
            CreditLedgerPolicy::Skip => match self.db.award_user_credits(user_id, award).await {
                Ok(ledger) => ledger,
                Err(AppError::NotFound(_)) => {
                    tracing::info!(
                        user_id,
                        award = award.as_str(),
                        "Skipping credit award: user has no ledger"
                    );
                    return Ok(None);
                }
                Err(e) => return Err(e),
            },
        };

        tracing::info!(
            user_id,
            award = award.as_str(),
            credits = ledger.credits,
            impact_score = ledger.impact_score,
            "Awarded credits"
        );

        Ok(Some(ledger))
    }

    /// The caller's ledger, created zeroed on first read.
    pub async fn my_credits(&self, user: &AuthUser) -> Result<UserCredit> {
        self.db.initialize_user_credits(user.id).await
    }

    /// Up to [`LEADERBOARD_SIZE`] donated listings, newest first.
    pub async fn leaderboard(&self) -> Result<Vec<Food>> {
        let mut foods = self
            .db
            .get_foods(&FoodFilter::with_status(FoodStatus::Donated))
            .await?;
        foods.truncate(LEADERBOARD_SIZE);
        Ok(foods)
    }
}
