// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation procedures and their cascades onto listings and credits.

use crate::db::Database;
use crate::error::{AppError, ErrorKind, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CreditAward, FoodStatus, Reservation, ReservationStatus};
use crate::services::CreditService;

/// Claim, progress and inspect reservations.
#[derive(Clone)]
pub struct ReservationService {
    db: Database,
    credits: CreditService,
}

impl ReservationService {
    pub fn new(db: Database, credits: CreditService) -> Self {
        Self { db, credits }
    }

    /// Reserve an available listing for the caller.
    ///
    /// The availability check, the new `pending` reservation and the switch
    /// of the listing to `reserved` happen as one store operation.
    pub async fn create(&self, user: &AuthUser, food_id: u64) -> Result<Reservation> {
        if !user.can_receive() {
            return Err(AppError::Unauthorized(
                "Only receivers can make reservations".to_string(),
            ));
        }

        let (reservation, _) =
            self.db
                .reserve_food(food_id, user.id)
                .await
                .map_err(|err| match err.kind() {
                    ErrorKind::NotFound => AppError::NotFound("Food not found".to_string()),
                    ErrorKind::Conflict => AppError::Conflict("Food not available".to_string()),
                    _ => err,
                })?;

        tracing::info!(
            reservation_id = reservation.id,
            food_id,
            receiver_id = user.id,
            "Reservation created"
        );

        Ok(reservation)
    }

    pub async fn my_reservations(&self, user: &AuthUser) -> Result<Vec<Reservation>> {
        self.db.get_reservations_by_receiver(user.id).await
    }

    /// Move one of the caller's reservations to `status`.
    ///
    /// `completed` credits the receiver and marks the listing donated;
    /// `cancelled` puts a still-reserved listing back on the market.
    /// Re-applying the current status changes nothing.
    pub async fn update_status(
        &self,
        user: &AuthUser,
        reservation_id: u64,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let reservation = self
            .db
            .get_reservations_by_receiver(user.id)
            .await?
            .into_iter()
            .find(|r| r.id == reservation_id)
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        if reservation.status == status {
            return Ok(reservation);
        }

        if !reservation.status.can_transition_to(status) {
            return Err(AppError::Conflict(format!(
                "Cannot change reservation status from {} to {}",
                reservation.status, status
            )));
        }

        let updated = self
            .db
            .compare_and_set_reservation_status(reservation_id, reservation.status, status)
            .await?;

        tracing::info!(
            reservation_id,
            from = %reservation.status,
            to = %status,
            receiver_id = user.id,
            "Reservation status updated"
        );

        match status {
            ReservationStatus::Completed => self.complete(&updated).await?,
            ReservationStatus::Cancelled => self.release(&updated).await?,
            ReservationStatus::Pending | ReservationStatus::Confirmed => {}
        }

        Ok(updated)
    }

    /// Reservations on a listing. Only its donor or an admin may look.
    pub async fn list_for_food(&self, user: &AuthUser, food_id: u64) -> Result<Vec<Reservation>> {
        let food = self
            .db
            .get_food(food_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Food not found".to_string()))?;

        if food.donor_id != user.id && !user.is_admin() {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        self.db.get_reservations_by_food(food_id).await
    }

    async fn complete(&self, reservation: &Reservation) -> Result<()> {
        self.credits
            .award(reservation.receiver_id, CreditAward::Receipt)
            .await?;

        match self
            .db
            .compare_and_set_food_status(
                reservation.food_id,
                FoodStatus::Reserved,
                FoodStatus::Donated,
            )
            .await
        {
            Ok(_) => {
                tracing::info!(food_id = reservation.food_id, "Listing donated");
            }
            Err(AppError::NotFound(_) | AppError::Conflict(_)) => {
                tracing::warn!(
                    food_id = reservation.food_id,
                    reservation_id = reservation.id,
                    "Completed reservation for a listing that is no longer reserved"
                );
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    async fn release(&self, reservation: &Reservation) -> Result<()> {
        match self
            .db
            .compare_and_set_food_status(
                reservation.food_id,
                FoodStatus::Reserved,
                FoodStatus::Available,
            )
            .await
        {
            Ok(_) => {
                tracing::info!(food_id = reservation.food_id, "Listing released");
                Ok(())
            }
            Err(AppError::NotFound(_) | AppError::Conflict(_)) => {
                tracing::debug!(
                    food_id = reservation.food_id,
                    "Listing not reserved, nothing to release"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
