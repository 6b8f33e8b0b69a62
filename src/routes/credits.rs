// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `credits.*` procedures.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Food, UserCredit};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/rpc/credits.getLeaderboard", get(leaderboard))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/rpc/credits.getMyCredits", get(my_credits))
}

/// The caller's ledger (created on first read).
async fn my_credits(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserCredit>> {
    Ok(Json(state.credits.my_credits(&user).await?))
}

/// Most recent donated listings.
async fn leaderboard(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Food>>> {
    Ok(Json(state.credits.leaderboard().await?))
}
