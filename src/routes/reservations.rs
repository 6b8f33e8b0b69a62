// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `reservations.*` procedures. All of them require a session.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Reservation, ReservationStatus};
use crate::routes::extract::{ValidatedJson, ValidatedQuery};
use crate::routes::SuccessResponse;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/reservations.create", post(create))
        .route("/rpc/reservations.getMyReservations", get(my_reservations))
        .route("/rpc/reservations.updateStatus", post(update_status))
        .route("/rpc/reservations.listForFood", get(list_for_food))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FoodIdInput {
    pub food_id: u64,
}

/// Reserve an available listing (receivers and admins).
async fn create(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<FoodIdInput>,
) -> Result<Json<Reservation>> {
    Ok(Json(state.reservations.create(&user, input.food_id).await?))
}

async fn my_reservations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Reservation>>> {
    Ok(Json(state.reservations.my_reservations(&user).await?))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReservationStatusInput {
    pub reservation_id: u64,
    pub status: ReservationStatus,
}

/// Progress one of the caller's reservations.
async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(input): ValidatedJson<UpdateReservationStatusInput>,
) -> Result<Json<SuccessResponse>> {
    state
        .reservations
        .update_status(&user, input.reservation_id, input.status)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Reservations on one of the caller's listings.
async fn list_for_food(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedQuery(input): ValidatedQuery<FoodIdInput>,
) -> Result<Json<Vec<Reservation>>> {
    Ok(Json(
        state
            .reservations
            .list_for_food(&user, input.food_id)
            .await?,
    ))
}
