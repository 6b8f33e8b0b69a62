// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food listing procedures.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CreateFood, CreditAward, Food, FoodFilter, FoodStatus};
use crate::services::CreditService;

/// Listing lifecycle: create, browse, status changes by the owner.
#[derive(Clone)]
pub struct FoodService {
    db: Database,
    credits: CreditService,
}

impl FoodService {
    pub fn new(db: Database, credits: CreditService) -> Self {
        Self { db, credits }
    }

    pub async fn list(&self, filter: &FoodFilter) -> Result<Vec<Food>> {
        self.db.get_foods(filter).await
    }

    pub async fn get(&self, id: u64) -> Result<Option<Food>> {
        self.db.get_food(id).await
    }

    /// Create a listing owned by the caller and credit the donation.
    ///
    /// The donor and initial status are always taken from the caller and
    /// `available`, whatever `food` carries.
    pub async fn create(&self, user: &AuthUser, food: CreateFood) -> Result<Food> {
        if !user.can_donate() {
            return Err(AppError::Unauthorized(
                "Only donors can create food listings".to_string(),
            ));
        }

        let food = self
            .db
            .create_food(CreateFood {
                donor_id: user.id,
                status: Some(FoodStatus::Available),
                ..food
            })
            .await?;

        tracing::info!(
            food_id = food.id,
            donor_id = food.donor_id,
            category = %food.category,
            "Food listing created"
        );

        self.credits.award(user.id, CreditAward::Donation).await?;

        Ok(food)
    }

    /// Change a listing's status. Only its donor or an admin may do this.
    pub async fn update_status(
        &self,
        user: &AuthUser,
        food_id: u64,
        status: FoodStatus,
    ) -> Result<Food> {
        let food = self
            .db
            .get_food(food_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Food not found".to_string()))?;

        if food.donor_id != user.id && !user.is_admin() {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }

        if !food.status.can_transition_to(status) {
            return Err(AppError::Conflict(format!(
                "Cannot change food status from {} to {}",
                food.status, status
            )));
        }

        // Taking a reserved listing off hold also ends the claim on it, so
        // a later reservation cannot run alongside the old one.
        let updated = match (food.status, status) {
            (FoodStatus::Reserved, FoodStatus::Available | FoodStatus::Expired) => {
                let (updated, cancelled) = self.db.release_food(food_id, status).await?;
                for reservation in &cancelled {
                    tracing::info!(
                        reservation_id = reservation.id,
                        food_id,
                        receiver_id = reservation.receiver_id,
                        "Reservation cancelled by listing release"
                    );
                }
                updated
            }
            _ => {
                self.db
                    .compare_and_set_food_status(food_id, food.status, status)
                    .await?
            }
        };

        tracing::info!(
            food_id,
            from = %food.status,
            to = %status,
            user_id = user.id,
            "Food status updated"
        );

        Ok(updated)
    }

    /// Listings donated by the caller, newest first.
    pub async fn my_listings(&self, user: &AuthUser) -> Result<Vec<Food>> {
        self.db.get_foods(&FoodFilter::with_donor(user.id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CreditLedgerPolicy;
    use crate::error::ErrorKind;
    use crate::models::{Role, UserType};

    fn service() -> (FoodService, Database) {
        let db = Database::new();
        let credits = CreditService::new(db.clone(), CreditLedgerPolicy::Initialize);
        (FoodService::new(db.clone(), credits), db)
    }

    fn user(id: u64, user_type: UserType, role: Role) -> AuthUser {
        AuthUser {
            id,
            open_id: format!("oid-{}", id),
            role,
            user_type,
        }
    }

    fn rice() -> CreateFood {
        CreateFood {
            name: "Rice".to_string(),
            category: "Grains".to_string(),
            quantity: "5kg".to_string(),
            location: "X".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_ignores_supplied_donor_and_status() {
        let (foods, _) = service();
        let donor = user(1, UserType::Donor, Role::User);

        let food = foods
            .create(
                &donor,
                CreateFood {
                    donor_id: 77,
                    status: Some(FoodStatus::Donated),
                    ..rice()
                },
            )
            .await
            .unwrap();

        assert_eq!(food.donor_id, 1);
        assert_eq!(food.status, FoodStatus::Available);
    }

    #[tokio::test]
    async fn test_receiver_cannot_create() {
        let (foods, db) = service();
        let receiver = user(2, UserType::Receiver, Role::User);

        let err = foods.create(&receiver, rice()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(db.store().food_count(), 0);
        assert_eq!(db.get_user_credits(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_admin_can_update_any_listing() {
        let (foods, _) = service();
        let donor = user(1, UserType::Donor, Role::User);
        let admin = user(3, UserType::Admin, Role::Admin);
        let food = foods.create(&donor, rice()).await.unwrap();

        let updated = foods
            .update_status(&admin, food.id, FoodStatus::Expired)
            .await
            .unwrap();

        assert_eq!(updated.status, FoodStatus::Expired);
    }

    #[tokio::test]
    async fn test_update_status_rejections() {
        let (foods, _) = service();
        let donor = user(1, UserType::Donor, Role::User);
        let other = user(2, UserType::Donor, Role::User);
        let food = foods.create(&donor, rice()).await.unwrap();

        let err = foods
            .update_status(&other, food.id, FoodStatus::Expired)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = foods
            .update_status(&donor, 999, FoodStatus::Expired)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        foods
            .update_status(&donor, food.id, FoodStatus::Donated)
            .await
            .unwrap();
        let err = foods
            .update_status(&donor, food.id, FoodStatus::Available)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_my_listings_only_returns_own() {
        let (foods, _) = service();
        let donor = user(1, UserType::Donor, Role::User);
        let other = user(2, UserType::Donor, Role::User);
        foods.create(&donor, rice()).await.unwrap();
        foods.create(&other, rice()).await.unwrap();
        foods.create(&donor, rice()).await.unwrap();

        let mine = foods.my_listings(&donor).await.unwrap();

        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|f| f.donor_id == 1));
    }
}
