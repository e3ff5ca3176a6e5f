//! JSON body extractor that runs `validator` rules, plus the field rules the
//! request types share.

use axum::Json;
use axum::extract::{FromRequest, Request};
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

/// Wrapper for a JSON body that passed validation.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e.body_text())))?;

        value.validate().map_err(|errors| ApiError::Validation(describe(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// `field: message` pairs, sorted so the output is stable.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let msg = error
                    .message
                    .as_ref()
                    .map(|m| m.as_ref())
                    .unwrap_or_else(|| error.code.as_ref());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

lazy_static! {
    /// 2-8 uppercase letters/digits, e.g. `AI101`.
    pub static ref FLIGHT_NUMBER_RE: Regex = Regex::new(r"^[A-Z0-9]{2,8}$").unwrap();
    /// Three-letter IATA airport code.
    pub static ref IATA_RE: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();
    pub static ref COUNTRY_CODE_RE: Regex = Regex::new(r"^\+[0-9]{1,4}$").unwrap();
    pub static ref PHONE_NUMBER_RE: Regex = Regex::new(r"^[0-9]{10,15}$").unwrap();
}

pub fn validate_person_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("name", "Name is required"));
    }
    if value.chars().count() > 100 {
        return Err(invalid("name", "Name must be less than 100 characters"));
    }
    if !value.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        return Err(invalid("name", "Name can only contain letters and spaces"));
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

pub fn validate_dob(value: &str) -> Result<(), ValidationError> {
    let dob = parse_date(value).ok_or_else(|| invalid("dob", "Invalid date format"))?;
    if dob > Utc::now().date_naive() {
        return Err(invalid("dob", "Date of birth cannot be in the future"));
    }
    Ok(())
}

pub fn validate_passenger_ids(ids: &[i64]) -> Result<(), ValidationError> {
    if ids.iter().all(|id| *id > 0) {
        Ok(())
    } else {
        Err(invalid(
            "passenger_info",
            "Passenger ID must be a positive integer",
        ))
    }
}

pub fn validate_seat_numbers(value: &Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(invalid(
            "seat_numbers",
            "Seat numbers must be a valid JSON object",
        ))
    }
}
