// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod credits;
pub mod foods;
pub mod reservations;

pub use credits::CreditService;
pub use foods::FoodService;
pub use reservations::ReservationService;
