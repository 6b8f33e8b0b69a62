// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `foods.*` procedures.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{CreateFood, Food, FoodFilter, FoodStatus};
use crate::routes::extract::{
    latitude_validator, longitude_validator, ValidatedJson, ValidatedQuery,
};
use crate::routes::SuccessResponse;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Public procedures.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/foods.list", get(list))
        .route("/rpc/foods.getById", get(get_by_id))
}

/// Procedures requiring a session.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/foods.create", post(create))
        .route("/rpc/foods.updateStatus", post(update_status))
        .route("/rpc/foods.myListings", get(my_listings))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListFoodsInput {
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub status: Option<FoodStatus>,
}

/// Listings matching the filters, newest first.
async fn list(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(input): ValidatedQuery<ListFoodsInput>,
) -> Result<Json<Vec<Food>>> {
    let filter = FoodFilter {
        category: input.category,
        status: input.status,
        donor_id: None,
    };
    Ok(Json(state.foods.list(&filter).await?))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GetFoodInput {
    pub id: u64,
}

/// A single listing, or `null`.
async fn get_by_id(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(input): ValidatedQuery<GetFoodInput>,
) -> Result<Json<Option<Food>>> {
    Ok(Json(state.foods.get(input.id).await?))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFoodInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub quantity: String,
    pub expiry_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[validate(custom(function = "latitude_validator"))]
    pub latitude: Option<String>,
    #[validate(custom(function = "longitude_validator"))]
    pub longitude: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
}

impl CreateFoodInput {
    fn into_create_food(self, donor_id: u64) -> CreateFood {
        CreateFood {
            donor_id,
            name: self.name,
            description: self.description,
            category: self.category,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self.image_url,
            status: Some(FoodStatus::Available),
        }
    }
}

/// Create a listing (donors and admins).
async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<CreateFoodInput>,
) -> Result<Json<Food>> {
    let food = state
        .foods
        .create(&user, input.into_create_food(user.id))
        .await?;
    Ok(Json(food))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateFoodStatusInput {
    pub food_id: u64,
    pub status: FoodStatus,
}

/// Change a listing's status (its donor or an admin).
async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<UpdateFoodStatusInput>,
) -> Result<Json<SuccessResponse>> {
    state
        .foods
        .update_status(&user, input.food_id, input.status)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// The caller's own listings.
async fn my_listings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Food>>> {
    Ok(Json(state.foods.my_listings(&user).await?))
}
