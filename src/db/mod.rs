// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data layer: the in-memory store and the async façade over it.

pub mod database;
pub mod store;

pub use database::Database;
pub use store::{Store, StoreError};
