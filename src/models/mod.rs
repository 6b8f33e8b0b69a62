// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credits;
pub mod food;
pub mod reservation;
pub mod user;

pub use credits::{CreditAward, CreditsUpdate, UserCredit};
pub use food::{CreateFood, Food, FoodFilter, FoodStatus, NewFood};
pub use reservation::{NewReservation, Reservation, ReservationStatus};
pub use user::{NewUser, Role, UpsertUser, User, UserType};
