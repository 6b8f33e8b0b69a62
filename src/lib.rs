// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! ReFood: surplus food donation marketplace
//!
//! This crate provides the backend API where donors list surplus food,
//! receivers reserve it, and completed donations earn credits.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::{CreditService, FoodService, ReservationService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub foods: FoodService,
    pub reservations: ReservationService,
    pub credits: CreditService,
}

impl AppState {
    /// Wire the services around `db` according to `config`.
    pub fn new(config: Config, db: Database) -> Self {
        let credits = CreditService::new(db.clone(), config.credit_ledger_policy);
        let foods = FoodService::new(db.clone(), credits.clone());
        let reservations = ReservationService::new(db.clone(), credits.clone());

        Self {
            config,
            db,
            foods,
            reservations,
            credits,
        }
    }
}
