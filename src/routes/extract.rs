// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Procedure input extractors.
//!
//! Reads take their input from the query string, writes from a JSON body.
//! Both reject malformed or invalid input with a `validation` error before
//! the handler runs.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// JSON body that deserialized and passed validation.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(format!("Invalid input: {}", e)))?;

        Ok(Self(value))
    }
}

/// Query string that deserialized and passed validation.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(format!("Invalid input: {}", e)))?;

        Ok(Self(value))
    }
}

fn coordinate_in_range(value: &str, limit: f64, code: &'static str) -> Result<(), ValidationError> {
    if value.len() > 50 {
        return Err(ValidationError::new(code));
    }
    match value.trim().parse::<f64>() {
        Ok(degrees) if degrees.is_finite() && degrees.abs() <= limit => Ok(()),
        _ => Err(ValidationError::new(code)),
    }
}

/// Decimal degrees in [-90, 90].
pub fn latitude_validator(value: &str) -> Result<(), ValidationError> {
    coordinate_in_range(value, 90.0, "invalid_latitude")
}

/// Decimal degrees in [-180, 180].
pub fn longitude_validator(value: &str) -> Result<(), ValidationError> {
    coordinate_in_range(value, 180.0, "invalid_longitude")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates() {
        assert!(latitude_validator("-23.5505").is_ok());
        assert!(longitude_validator("-46.6333").is_ok());
        assert!(longitude_validator("180").is_ok());

        assert!(latitude_validator("91").is_err());
        assert!(longitude_validator("-180.5").is_err());
        assert!(latitude_validator("north").is_err());
        assert!(latitude_validator("NaN").is_err());
    }
}
