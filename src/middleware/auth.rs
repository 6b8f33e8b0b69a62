// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT session authentication middleware.

use crate::config::{Config, SESSION_COOKIE_NAME, SESSION_TTL_DAYS};
use crate::error::AppError;
use crate::models::{Role, User, UserType};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (external login identifier)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated caller, resolved from the session to a stored user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: u64,
    pub open_id: String,
    pub role: Role,
    pub user_type: UserType,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Donors and admins may list food.
    pub fn can_donate(&self) -> bool {
        self.user_type == UserType::Donor || self.is_admin()
    }

    /// Receivers and admins may reserve food.
    pub fn can_receive(&self) -> bool {
        self.user_type == UserType::Receiver || self.is_admin()
    }
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            open_id: user.open_id.clone(),
            role: user.role,
            user_type: user.user_type,
        }
    }
}

/// Pull the raw session token from the cookie, falling back to a bearer header.
fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Decode and verify a session token, returning the subject.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Option<String> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims.sub)
}

/// Resolve the caller's user, if the request carries a valid session.
pub async fn resolve_session(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<Option<User>, AppError> {
    let Some(token) = session_token(jar, headers) else {
        return Ok(None);
    };
    let Some(open_id) = verify_jwt(&token, &state.config.jwt_signing_key) else {
        tracing::debug!("Rejected invalid session token");
        return Ok(None);
    };

    state.db.get_user_by_open_id(&open_id).await
}

/// Middleware that requires a valid session for a known user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_session(&state, &jar, request.headers())
        .await?
        .ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(AuthUser::from(&user));

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(open_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: open_id.to_string(),
        iat: now,
        exp: now + (SESSION_TTL_DAYS as usize) * 24 * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Session cookie carrying `token`.
pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time_days(SESSION_TTL_DAYS))
        .build()
}

/// Expired session cookie with the same attributes, for logout.
pub fn removal_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time_days(0))
        .build()
}

fn time_days(days: i64) -> time::Duration {
    time::Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_round_trip() {
        let key = b"unit_test_signing_key";
        let token = create_jwt("oid-42", key).unwrap();

        assert_eq!(verify_jwt(&token, key), Some("oid-42".to_string()));
        assert_eq!(verify_jwt(&token, b"another_key"), None);
        assert_eq!(verify_jwt("not.a.token", key), None);
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());

        let jar = CookieJar::new();
        assert_eq!(session_token(&jar, &headers), Some("abc.def".to_string()));

        let jar = jar.add(Cookie::new(SESSION_COOKIE_NAME, "from-cookie"));
        assert_eq!(
            session_token(&jar, &headers),
            Some("from-cookie".to_string())
        );
    }

    #[test]
    fn test_permissions() {
        let donor = AuthUser {
            id: 1,
            open_id: "d".to_string(),
            role: Role::User,
            user_type: UserType::Donor,
        };
        assert!(donor.can_donate());
        assert!(!donor.can_receive());

        let admin = AuthUser {
            role: Role::Admin,
            ..donor.clone()
        };
        assert!(admin.can_donate());
        assert!(admin.can_receive());
    }

    #[test]
    fn test_removal_cookie_attributes() {
        let config = Config::test_default();
        let cookie = removal_cookie(&config).to_string();

        assert!(cookie.starts_with("refood_session="));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(!cookie.contains("Secure"));
    }
}
