// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data-access façade with typed operations.
//!
//! Normalizes loosely-filled inputs (empty optional strings become `None`,
//! statuses default to `available`/`pending`) and stamps creation timestamps
//! before handing records to the [`Store`]. Store failures are surfaced as
//! [`AppError`]s so callers can branch on them.

use chrono::Utc;
use std::sync::Arc;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{
    CreateFood, CreditAward, CreditsUpdate, Food, FoodFilter, FoodStatus, NewFood,
    NewReservation, NewUser, Reservation, ReservationStatus, UpsertUser, User, UserCredit,
};

/// Cloneable handle to the shared store.
#[derive(Clone, Default)]
pub struct Database {
    store: Arc<Store>,
}

/// Treat empty strings the same as a missing value.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Database {
    /// Create a database backed by a fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the underlying store (counts, benchmarks).
    pub fn store(&self) -> &Store {
        &self.store
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create the user if no user with the same `open_id` exists.
    ///
    /// Existing users are returned unchanged; profile fields in `user` are
    /// ignored for them.
    pub async fn upsert_user(&self, user: UpsertUser) -> Result<User> {
        let open_id = non_empty(user.open_id).ok_or_else(|| {
            AppError::Validation("User openId is required for upsert".to_string())
        })?;

        let now = Utc::now();
        let (stored, created) = self.store.insert_user_if_absent(NewUser {
            open_id,
            name: non_empty(user.name),
            email: non_empty(user.email),
            login_method: non_empty(user.login_method),
            role: user.role.unwrap_or_default(),
            user_type: user.user_type.unwrap_or_default(),
            organization_name: non_empty(user.organization_name),
            phone: non_empty(user.phone),
            address: non_empty(user.address),
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        });

        if created {
            tracing::info!(
                user_id = stored.id,
                user_type = ?stored.user_type,
                "Created user"
            );
        }

        Ok(stored)
    }

    pub async fn get_user(&self, id: u64) -> Result<Option<User>> {
        Ok(self.store.get_user(id))
    }

    pub async fn get_user_by_open_id(&self, open_id: &str) -> Result<Option<User>> {
        Ok(self.store.get_user_by_open_id(open_id))
    }

    // ─── Food Operations ─────────────────────────────────────────

    /// Foods matching every supplied filter, newest first.
    pub async fn get_foods(&self, filter: &FoodFilter) -> Result<Vec<Food>> {
        Ok(self.store.get_foods(filter))
    }

    pub async fn get_food(&self, id: u64) -> Result<Option<Food>> {
        Ok(self.store.get_food(id))
    }

    pub async fn create_food(&self, food: CreateFood) -> Result<Food> {
        let now = Utc::now();
        Ok(self.store.add_food(NewFood {
            donor_id: food.donor_id,
            name: food.name,
            description: non_empty(food.description),
            category: food.category,
            quantity: food.quantity,
            expiry_date: food.expiry_date,
            location: food.location,
            latitude: non_empty(food.latitude),
            longitude: non_empty(food.longitude),
            image_url: non_empty(food.image_url),
            status: food.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }))
    }

    pub async fn update_food_status(&self, id: u64, status: FoodStatus) -> Result<Food> {
        Ok(self.store.update_food_status(id, status)?)
    }

    /// Set the food's status only if it is still `expected` (else `Conflict`).
    pub async fn compare_and_set_food_status(
        &self,
        id: u64,
        expected: FoodStatus,
        status: FoodStatus,
    ) -> Result<Food> {
        Ok(self
            .store
            .compare_and_set_food_status(id, expected, status)?)
    }

    // ─── Reservation Operations ──────────────────────────────────

    pub async fn create_reservation(
        &self,
        food_id: u64,
        receiver_id: u64,
        status: Option<ReservationStatus>,
    ) -> Result<Reservation> {
        let now = Utc::now();
        Ok(self.store.add_reservation(NewReservation {
            food_id,
            receiver_id,
            status: status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }))
    }

    /// Claim an available food: creates a `pending` reservation and flips
    /// the food to `reserved` in one step.
    pub async fn reserve_food(&self, food_id: u64, receiver_id: u64) -> Result<(Reservation, Food)> {
        Ok(self.store.reserve_food(food_id, receiver_id)?)
    }

    /// Move a reserved food to `status`, cancelling the reservations that
    /// still hold it. Fails with `Conflict` unless the food is `reserved`.
    pub async fn release_food(
        &self,
        food_id: u64,
        status: FoodStatus,
    ) -> Result<(Food, Vec<Reservation>)> {
        Ok(self.store.release_food(food_id, status)?)
    }

    pub async fn get_reservation(&self, id: u64) -> Result<Option<Reservation>> {
        Ok(self.store.get_reservation(id))
    }

    pub async fn get_reservations_by_receiver(&self, receiver_id: u64) -> Result<Vec<Reservation>> {
        Ok(self.store.get_reservations_by_receiver(receiver_id))
    }

    pub async fn get_reservations_by_food(&self, food_id: u64) -> Result<Vec<Reservation>> {
        Ok(self.store.get_reservations_by_food(food_id))
    }

    pub async fn update_reservation_status(
        &self,
        id: u64,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        Ok(self.store.update_reservation_status(id, status)?)
    }

    /// Set the reservation's status only if it is still `expected`.
    pub async fn compare_and_set_reservation_status(
        &self,
        id: u64,
        expected: ReservationStatus,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        Ok(self
            .store
            .compare_and_set_reservation_status(id, expected, status)?)
    }

    // ─── Credit Operations ───────────────────────────────────────

    pub async fn get_user_credits(&self, user_id: u64) -> Result<Option<UserCredit>> {
        Ok(self.store.get_user_credits(user_id))
    }

    pub async fn initialize_user_credits(&self, user_id: u64) -> Result<UserCredit> {
        Ok(self.store.initialize_user_credits(user_id))
    }

    pub async fn update_user_credits(
        &self,
        user_id: u64,
        update: &CreditsUpdate,
    ) -> Result<UserCredit> {
        Ok(self.store.update_user_credits(user_id, update)?)
    }

    /// Increment an existing ledger (`NotFound` when the user has none).
    pub async fn award_user_credits(&self, user_id: u64, award: CreditAward) -> Result<UserCredit> {
        Ok(self.store.award_user_credits(user_id, award)?)
    }

    /// Increment the ledger, creating it first when absent.
    pub async fn initialize_and_award_user_credits(
        &self,
        user_id: u64,
        award: CreditAward,
    ) -> Result<UserCredit> {
        Ok(self.store.initialize_and_award_user_credits(user_id, award))
    }
}
