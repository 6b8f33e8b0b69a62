// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use refood::config::Config;
use refood::db::Database;
use refood::middleware::auth::create_jwt;
use refood::models::{Role, UpsertUser, User, UserType};
use refood::routes::create_router;
use refood::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over a fresh store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, Database::new()));
    (create_router(state.clone()), state)
}

/// Test app with the development login procedure turned on.
#[allow(dead_code)]
pub fn create_login_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config {
        login_enabled: true,
        ..Config::test_default()
    })
}

/// Session token for `open_id`, signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(open_id: &str) -> String {
    create_jwt(open_id, &Config::test_default().jwt_signing_key).unwrap()
}

/// Insert a user directly and return it with a bearer token.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, open_id: &str, user_type: UserType) -> (User, String) {
    let user = state
        .db
        .upsert_user(UpsertUser {
            open_id: Some(open_id.to_string()),
            name: Some(open_id.to_string()),
            user_type: Some(user_type),
            ..Default::default()
        })
        .await
        .unwrap();
    (user, create_test_jwt(open_id))
}

#[allow(dead_code)]
pub async fn seed_admin(state: &AppState, open_id: &str) -> (User, String) {
    let user = state
        .db
        .upsert_user(UpsertUser {
            open_id: Some(open_id.to_string()),
            role: Some(Role::Admin),
            user_type: Some(UserType::Admin),
            ..Default::default()
        })
        .await
        .unwrap();
    (user, create_test_jwt(open_id))
}

/// Issue a GET and decode the JSON body.
#[allow(dead_code)]
pub async fn get_json(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// Issue a POST with a JSON body and decode the JSON response.
#[allow(dead_code)]
pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// A valid `foods.create` body.
#[allow(dead_code)]
pub fn food_body(name: &str, category: &str) -> Value {
    serde_json::json!({
        "name": name,
        "category": category,
        "quantity": "5kg",
        "location": "Rua A, 100",
    })
}
