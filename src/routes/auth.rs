// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: `auth.me`, `auth.login`, `auth.logout`.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, removal_cookie, resolve_session, session_cookie};
use crate::models::{UpsertUser, User, UserType};
use crate::routes::extract::ValidatedJson;
use crate::routes::SuccessResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/auth.me", get(me))
        .route("/rpc/auth.login", post(login))
        .route("/rpc/auth.logout", post(logout))
}

/// The caller's user, or `null` without a valid session.
async fn me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<Option<User>>> {
    Ok(Json(resolve_session(&state, &jar, &headers).await?))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginInput {
    #[validate(length(min = 1, max = 64))]
    pub open_id: String,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(email, length(max = 320))]
    pub email: Option<String>,
    #[validate(length(max = 64))]
    pub login_method: Option<String>,
    pub user_type: Option<UserType>,
    #[validate(length(max = 255))]
    pub organization_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 5000))]
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Open a session for `openId`, creating the user on first login.
///
/// Development stand-in for the OAuth callback: the openId is trusted as
/// given, so the procedure answers `unauthorized` unless `LOGIN_ENABLED`
/// is set.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    if !state.config.login_enabled {
        return Err(AppError::Unauthorized("Login is disabled".to_string()));
    }
    if input.user_type == Some(UserType::Admin) {
        return Err(AppError::Validation(
            "userType must be donor or receiver".to_string(),
        ));
    }

    // Role is left unset so new accounts always get the default.
    let user = state
        .db
        .upsert_user(UpsertUser {
            open_id: Some(input.open_id),
            name: input.name,
            email: input.email,
            login_method: input.login_method,
            role: None,
            user_type: input.user_type,
            organization_name: input.organization_name,
            phone: input.phone,
            address: input.address,
        })
        .await?;

    let token = create_jwt(&user.open_id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(user_id = user.id, "Session opened");

    let jar = jar.add(session_cookie(token.clone(), &state.config));
    Ok((jar, Json(LoginResponse { user, token })))
}

/// Clear the session cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    (
        jar.add(removal_cookie(&state.config)),
        Json(SuccessResponse::ok()),
    )
}
