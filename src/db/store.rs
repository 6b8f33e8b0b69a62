// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory entity store.
//!
//! One concurrent map per entity kind plus a monotonic id sequence per kind.
//! Everything handed out is an owned copy; the only way to change state is
//! through the operations below. Read-check-write sequences on a single
//! entity run while holding that entity's map entry, which makes them atomic
//! with respect to every other store operation on the same entity.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{
    CreditAward, CreditsUpdate, Food, FoodFilter, FoodStatus, NewFood, NewReservation, NewUser,
    Reservation, ReservationStatus, User, UserCredit,
};

/// Store-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("{entity} {id} is {actual}, expected {expected}")]
    StatusMismatch {
        entity: &'static str,
        id: u64,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Monotonic id allocator starting at 1.
#[derive(Debug)]
struct IdSequence(AtomicU64);

impl IdSequence {
    fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Process-lifetime entity store.
#[derive(Debug)]
pub struct Store {
    users: DashMap<u64, User>,
    /// open_id -> user id (uniqueness index)
    users_by_open_id: DashMap<String, u64>,
    foods: DashMap<u64, Food>,
    reservations: DashMap<u64, Reservation>,
    /// Keyed by user id: at most one ledger per user.
    credits: DashMap<u64, UserCredit>,
    user_ids: IdSequence,
    food_ids: IdSequence,
    reservation_ids: IdSequence,
    credit_ids: IdSequence,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            users_by_open_id: DashMap::new(),
            foods: DashMap::new(),
            reservations: DashMap::new(),
            credits: DashMap::new(),
            user_ids: IdSequence::new(),
            food_ids: IdSequence::new(),
            reservation_ids: IdSequence::new(),
            credit_ids: IdSequence::new(),
        }
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Insert `new` unless a user with the same `open_id` exists.
    ///
    /// Returns the stored user and whether it was created by this call.
    pub fn insert_user_if_absent(&self, new: NewUser) -> (User, bool) {
        match self.users_by_open_id.entry(new.open_id.clone()) {
            Entry::Occupied(entry) => {
                let id = *entry.get();
                if let Some(existing) = self.users.get(&id) {
                    return (existing.value().clone(), false);
                }
                let user = new.with_id(id);
                self.users.insert(id, user.clone());
                (user, true)
            }
            Entry::Vacant(entry) => {
                let user = new.with_id(self.user_ids.next());
                self.users.insert(user.id, user.clone());
                entry.insert(user.id);
                (user, true)
            }
        }
    }

    pub fn get_user(&self, id: u64) -> Option<User> {
        self.users.get(&id).map(|user| user.value().clone())
    }

    pub fn get_user_by_open_id(&self, open_id: &str) -> Option<User> {
        let id = *self.users_by_open_id.get(open_id)?;
        self.get_user(id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // ─── Foods ───────────────────────────────────────────────────

    pub fn add_food(&self, new: NewFood) -> Food {
        let food = new.with_id(self.food_ids.next());
        self.foods.insert(food.id, food.clone());
        food
    }

    pub fn get_food(&self, id: u64) -> Option<Food> {
        self.foods.get(&id).map(|food| food.value().clone())
    }

    /// All foods matching `filter`, newest first.
    pub fn get_foods(&self, filter: &FoodFilter) -> Vec<Food> {
        let mut foods: Vec<Food> = self
            .foods
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        // Ids break ties between listings created within the same instant.
        foods.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        foods
    }

    pub fn update_food_status(&self, id: u64, status: FoodStatus) -> Result<Food, StoreError> {
        let mut food = self.foods.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "food",
            id,
        })?;
        food.status = status;
        food.updated_at = Utc::now();
        Ok(food.value().clone())
    }

    /// Set the status only if it is currently `expected`.
    pub fn compare_and_set_food_status(
        &self,
        id: u64,
        expected: FoodStatus,
        status: FoodStatus,
    ) -> Result<Food, StoreError> {
        let mut food = self.foods.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "food",
            id,
        })?;
        if food.status != expected {
            return Err(StoreError::StatusMismatch {
                entity: "food",
                id,
                expected: expected.as_str(),
                actual: food.status.as_str(),
            });
        }
        food.status = status;
        food.updated_at = Utc::now();
        Ok(food.value().clone())
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    // ─── Reservations ────────────────────────────────────────────

    pub fn add_reservation(&self, new: NewReservation) -> Reservation {
        let reservation = new.with_id(self.reservation_ids.next());
        self.reservations
            .insert(reservation.id, reservation.clone());
        reservation
    }

    /// Atomically claim an available food for `receiver_id`.
    ///
    /// While the food's entry is held: check it is `available`, insert a
    /// `pending` reservation and flip the food to `reserved`. Concurrent
    /// claims on the same food therefore see the first claim's write.
    pub fn reserve_food(
        &self,
        food_id: u64,
        receiver_id: u64,
    ) -> Result<(Reservation, Food), StoreError> {
        let mut food = self.foods.get_mut(&food_id).ok_or(StoreError::NotFound {
            entity: "food",
            id: food_id,
        })?;
        if food.status != FoodStatus::Available {
            return Err(StoreError::StatusMismatch {
                entity: "food",
                id: food_id,
                expected: FoodStatus::Available.as_str(),
                actual: food.status.as_str(),
            });
        }

        let now = Utc::now();
        let reservation = self.add_reservation(NewReservation::pending(food_id, receiver_id, now));
        food.status = FoodStatus::Reserved;
        food.updated_at = now;

        Ok((reservation, food.value().clone()))
    }

    /// Move a reserved food to `status` and cancel the reservations still
    /// holding it.
    ///
    /// Runs under the food's entry, so no new reservation can be made for it
    /// until the food has left `reserved`. Returns the updated food and the
    /// reservations that were cancelled.
    pub fn release_food(
        &self,
        food_id: u64,
        status: FoodStatus,
    ) -> Result<(Food, Vec<Reservation>), StoreError> {
        let mut food = self.foods.get_mut(&food_id).ok_or(StoreError::NotFound {
            entity: "food",
            id: food_id,
        })?;
        if food.status != FoodStatus::Reserved {
            return Err(StoreError::StatusMismatch {
                entity: "food",
                id: food_id,
                expected: FoodStatus::Reserved.as_str(),
                actual: food.status.as_str(),
            });
        }

        let now = Utc::now();
        let mut cancelled = Vec::new();
        for mut reservation in self.reservations.iter_mut() {
            if reservation.food_id == food_id && !reservation.status.is_terminal() {
                reservation.set_status(ReservationStatus::Cancelled, now);
                cancelled.push(reservation.value().clone());
            }
        }
        cancelled.sort_by_key(|r| r.id);

        food.status = status;
        food.updated_at = now;

        Ok((food.value().clone(), cancelled))
    }

    pub fn get_reservation(&self, id: u64) -> Option<Reservation> {
        self.reservations
            .get(&id)
            .map(|reservation| reservation.value().clone())
    }

    pub fn get_reservations_by_receiver(&self, receiver_id: u64) -> Vec<Reservation> {
        self.reservations_where(|r| r.receiver_id == receiver_id)
    }

    pub fn get_reservations_by_food(&self, food_id: u64) -> Vec<Reservation> {
        self.reservations_where(|r| r.food_id == food_id)
    }

    fn reservations_where(&self, predicate: impl Fn(&Reservation) -> bool) -> Vec<Reservation> {
        let mut reservations: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        reservations.sort_by_key(|r| r.id);
        reservations
    }

    pub fn update_reservation_status(
        &self,
        id: u64,
        status: ReservationStatus,
    ) -> Result<Reservation, StoreError> {
        let mut reservation = self
            .reservations
            .get_mut(&id)
            .ok_or(StoreError::NotFound {
                entity: "reservation",
                id,
            })?;
        reservation.set_status(status, Utc::now());
        Ok(reservation.value().clone())
    }

    /// Set the status only if it is currently `expected`.
    pub fn compare_and_set_reservation_status(
        &self,
        id: u64,
        expected: ReservationStatus,
        status: ReservationStatus,
    ) -> Result<Reservation, StoreError> {
        let mut reservation = self
            .reservations
            .get_mut(&id)
            .ok_or(StoreError::NotFound {
                entity: "reservation",
                id,
            })?;
        if reservation.status != expected {
            return Err(StoreError::StatusMismatch {
                entity: "reservation",
                id,
                expected: expected.as_str(),
                actual: reservation.status.as_str(),
            });
        }
        reservation.set_status(status, Utc::now());
        Ok(reservation.value().clone())
    }

    pub fn reservation_count(&self) -> usize {
        self.reservations.len()
    }

    // ─── User Credits ────────────────────────────────────────────

    pub fn get_user_credits(&self, user_id: u64) -> Option<UserCredit> {
        self.credits
            .get(&user_id)
            .map(|ledger| ledger.value().clone())
    }

    /// Existing ledger for `user_id`, or a new zeroed one. Idempotent.
    pub fn initialize_user_credits(&self, user_id: u64) -> UserCredit {
        self.credits
            .entry(user_id)
            .or_insert_with(|| UserCredit::zeroed(self.credit_ids.next(), user_id, Utc::now()))
            .value()
            .clone()
    }

    /// Merge `update` into the existing ledger.
    pub fn update_user_credits(
        &self,
        user_id: u64,
        update: &CreditsUpdate,
    ) -> Result<UserCredit, StoreError> {
        let mut ledger = self.credits.get_mut(&user_id).ok_or(StoreError::NotFound {
            entity: "user credits",
            id: user_id,
        })?;
        ledger.merge(update, Utc::now());
        Ok(ledger.value().clone())
    }

    /// Increment an existing ledger by `award`.
    pub fn award_user_credits(
        &self,
        user_id: u64,
        award: CreditAward,
    ) -> Result<UserCredit, StoreError> {
        let mut ledger = self.credits.get_mut(&user_id).ok_or(StoreError::NotFound {
            entity: "user credits",
            id: user_id,
        })?;
        ledger.apply(award, Utc::now());
        Ok(ledger.value().clone())
    }

    /// Increment the ledger by `award`, creating a zeroed one first if needed.
    pub fn initialize_and_award_user_credits(&self, user_id: u64, award: CreditAward) -> UserCredit {
        let now = Utc::now();
        let mut ledger = self
            .credits
            .entry(user_id)
            .or_insert_with(|| UserCredit::zeroed(self.credit_ids.next(), user_id, now));
        ledger.apply(award, now);
        ledger.value().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, UserType};
    use chrono::{DateTime, Duration};
    use std::sync::Arc;

    fn new_user(open_id: &str) -> NewUser {
        let now = Utc::now();
        NewUser {
            open_id: open_id.to_string(),
            name: None,
            email: None,
            login_method: None,
            role: Role::User,
            user_type: UserType::Donor,
            organization_name: None,
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        }
    }

    fn new_food(donor_id: u64, category: &str, created_at: DateTime<Utc>) -> NewFood {
        NewFood {
            donor_id,
            name: "Bread".to_string(),
            description: None,
            category: category.to_string(),
            quantity: "10 units".to_string(),
            expiry_date: None,
            location: "Bakery".to_string(),
            latitude: None,
            longitude: None,
            image_url: None,
            status: FoodStatus::Available,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_ids_are_sequential_per_kind() {
        let store = Store::new();
        let now = Utc::now();

        let (user, _) = store.insert_user_if_absent(new_user("a"));
        let first = store.add_food(new_food(user.id, "Bakery", now));
        let second = store.add_food(new_food(user.id, "Bakery", now));

        assert_eq!(user.id, 1);
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_insert_user_if_absent_keeps_first_record() {
        let store = Store::new();

        let (first, created) = store.insert_user_if_absent(new_user("oid"));
        assert!(created);

        let mut again = new_user("oid");
        again.name = Some("Changed".to_string());
        let (second, created) = store.insert_user_if_absent(again);

        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.name, None);
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.get_user_by_open_id("oid"), Some(first));
        assert_eq!(store.get_user_by_open_id("missing"), None);
    }

    #[test]
    fn test_get_foods_newest_first_with_filters() {
        let store = Store::new();
        let base = Utc::now();

        store.add_food(new_food(1, "Bakery", base));
        store.add_food(new_food(2, "Dairy", base + Duration::seconds(1)));
        store.add_food(new_food(1, "Dairy", base + Duration::seconds(2)));

        let all = store.get_foods(&FoodFilter::default());
        let ids: Vec<u64> = all.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let filter = FoodFilter {
            category: Some("Dairy".to_string()),
            donor_id: Some(1),
            ..Default::default()
        };
        let ids: Vec<u64> = store.get_foods(&filter).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_same_instant_orders_by_id_descending() {
        let store = Store::new();
        let now = Utc::now();
        store.add_food(new_food(1, "Bakery", now));
        store.add_food(new_food(1, "Bakery", now));

        let ids: Vec<u64> = store
            .get_foods(&FoodFilter::default())
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_updates_on_unknown_ids_fail() {
        let store = Store::new();

        assert_eq!(
            store.update_food_status(99, FoodStatus::Donated),
            Err(StoreError::NotFound {
                entity: "food",
                id: 99
            })
        );
        assert!(store
            .update_reservation_status(5, ReservationStatus::Completed)
            .is_err());
        assert!(store
            .update_user_credits(5, &CreditsUpdate::default())
            .is_err());
        assert!(store.award_user_credits(5, CreditAward::Donation).is_err());
    }

    #[test]
    fn test_reserve_food_flips_status_once() {
        let store = Store::new();
        let food = store.add_food(new_food(1, "Bakery", Utc::now()));

        let (reservation, reserved) = store.reserve_food(food.id, 7).unwrap();
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.receiver_id, 7);
        assert_eq!(reserved.status, FoodStatus::Reserved);

        let err = store.reserve_food(food.id, 8).unwrap_err();
        assert!(matches!(err, StoreError::StatusMismatch { .. }));
        assert_eq!(store.reservation_count(), 1);
        assert_eq!(store.get_reservations_by_food(food.id).len(), 1);
    }

    #[test]
    fn test_release_food_cancels_holding_reservations() {
        let store = Store::new();
        let food = store.add_food(new_food(1, "Bakery", Utc::now()));
        let other = store.add_food(new_food(1, "Bakery", Utc::now()));

        let (held, _) = store.reserve_food(food.id, 7).unwrap();
        let (untouched, _) = store.reserve_food(other.id, 8).unwrap();

        let (released, cancelled) = store.release_food(food.id, FoodStatus::Available).unwrap();
        assert_eq!(released.status, FoodStatus::Available);
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, held.id);
        assert_eq!(
            store.get_reservation(held.id).unwrap().status,
            ReservationStatus::Cancelled
        );
        assert_eq!(
            store.get_reservation(untouched.id).unwrap().status,
            ReservationStatus::Pending
        );

        // Only reserved foods can be released
        let err = store
            .release_food(food.id, FoodStatus::Expired)
            .unwrap_err();
        assert!(matches!(err, StoreError::StatusMismatch { .. }));

        // The next claim starts clean
        let (next, _) = store.reserve_food(food.id, 9).unwrap();
        let (_, cancelled) = store.release_food(food.id, FoodStatus::Expired).unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, next.id);
    }

    #[test]
    fn test_concurrent_reservations_single_winner() {
        let store = Arc::new(Store::new());
        let food_id = store.add_food(new_food(1, "Bakery", Utc::now())).id;

        let handles: Vec<_> = (0..16)
            .map(|receiver| {
                let store = store.clone();
                std::thread::spawn(move || store.reserve_food(food_id, 100 + receiver).is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(store.reservation_count(), 1);
        assert_eq!(store.get_food(food_id).unwrap().status, FoodStatus::Reserved);
    }

    #[test]
    fn test_compare_and_set_reservation_status() {
        let store = Store::new();
        let reservation = store.add_reservation(NewReservation::pending(1, 2, Utc::now()));

        let updated = store
            .compare_and_set_reservation_status(
                reservation.id,
                ReservationStatus::Pending,
                ReservationStatus::Confirmed,
            )
            .unwrap();
        assert_eq!(updated.status, ReservationStatus::Confirmed);

        let err = store
            .compare_and_set_reservation_status(
                reservation.id,
                ReservationStatus::Pending,
                ReservationStatus::Cancelled,
            )
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::StatusMismatch {
                entity: "reservation",
                id: reservation.id,
                expected: "pending",
                actual: "confirmed",
            }
        );
    }

    #[test]
    fn test_reservation_lookups() {
        let store = Store::new();
        let now = Utc::now();
        store.add_reservation(NewReservation::pending(1, 10, now));
        store.add_reservation(NewReservation::pending(2, 10, now));
        store.add_reservation(NewReservation::pending(1, 11, now));

        assert_eq!(store.get_reservations_by_receiver(10).len(), 2);
        assert_eq!(store.get_reservations_by_receiver(12).len(), 0);
        let by_food: Vec<u64> = store
            .get_reservations_by_food(1)
            .iter()
            .map(|r| r.receiver_id)
            .collect();
        assert_eq!(by_food, vec![10, 11]);
    }

    #[test]
    fn test_initialize_user_credits_is_idempotent() {
        let store = Store::new();

        let first = store.initialize_user_credits(5);
        store.award_user_credits(5, CreditAward::Donation).unwrap();
        let second = store.initialize_user_credits(5);

        assert_eq!(first.id, second.id);
        assert_eq!(second.credits, 10);
        assert_eq!(store.initialize_user_credits(6).id, first.id + 1);
    }

    #[test]
    fn test_initialize_and_award_creates_ledger() {
        let store = Store::new();

        let ledger = store.initialize_and_award_user_credits(3, CreditAward::Receipt);

        assert_eq!(ledger.user_id, 3);
        assert_eq!(ledger.credits, 5);
        assert_eq!(ledger.foods_received, 1);
        assert_eq!(store.get_user_credits(3), Some(ledger));
    }

    #[test]
    fn test_returned_copies_do_not_alias_store() {
        let store = Store::new();
        let mut food = store.add_food(new_food(1, "Bakery", Utc::now()));
        food.status = FoodStatus::Expired;

        assert_eq!(store.get_food(food.id).unwrap().status, FoodStatus::Available);
    }
}
