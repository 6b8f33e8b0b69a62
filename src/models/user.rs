// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Account role. Admins bypass the donor/receiver/ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// What the user does on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum UserType {
    Donor,
    #[default]
    Receiver,
    Admin,
}

/// User profile held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// External login identifier (unique across users)
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    /// How the user authenticated (e.g. "google")
    pub login_method: Option<String>,
    pub role: Role,
    pub user_type: UserType,
    pub organization_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

/// User record before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Role,
    pub user_type: UserType,
    pub organization_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

impl NewUser {
    pub fn with_id(self, id: u64) -> User {
        User {
            id,
            open_id: self.open_id,
            name: self.name,
            email: self.email,
            login_method: self.login_method,
            role: self.role,
            user_type: self.user_type,
            organization_name: self.organization_name,
            phone: self.phone,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_signed_in: self.last_signed_in,
        }
    }
}

/// Loosely-filled profile handed to `Database::upsert_user`.
///
/// Everything is optional; the façade applies defaults and rejects a
/// missing `open_id`.
#[derive(Debug, Clone, Default)]
pub struct UpsertUser {
    pub open_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Option<Role>,
    pub user_type: Option<UserType>,
    pub organization_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
