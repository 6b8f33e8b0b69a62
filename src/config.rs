// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Name of the session cookie carrying the JWT.
pub const SESSION_COOKIE_NAME: &str = "refood_session";

/// Session lifetime.
pub const SESSION_TTL_DAYS: i64 = 30;

/// What to do when a credit award targets a user with no ledger yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreditLedgerPolicy {
    /// Create a zeroed ledger, then award.
    #[default]
    Initialize,
    /// Drop the award (logged).
    Skip,
}

impl FromStr for CreditLedgerPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initialize" | "init" => Ok(CreditLedgerPolicy::Initialize),
            "skip" => Ok(CreditLedgerPolicy::Skip),
            _ => Err(ConfigError::Invalid("CREDIT_LEDGER_POLICY", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (CORS origin, cookie `Secure` flag)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Whether `auth.login` may open sessions. Development only: the
    /// procedure trusts the supplied openId, so it stays off unless
    /// `LOGIN_ENABLED` turns it on.
    pub login_enabled: bool,
    /// Award behavior for users without a credit ledger
    pub credit_ledger_policy: CreditLedgerPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            login_enabled: match env::var("LOGIN_ENABLED") {
                Ok(raw) => parse_bool("LOGIN_ENABLED", &raw)?,
                Err(_) => false,
            },
            credit_ledger_policy: match env::var("CREDIT_LEDGER_POLICY") {
                Ok(raw) => raw.parse()?,
                Err(_) => CreditLedgerPolicy::default(),
            },
        })
    }

    /// Deterministic config for tests, with the same defaults as `from_env`.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            login_enabled: false,
            credit_ledger_policy: CreditLedgerPolicy::Initialize,
        }
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(name, raw.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
