use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{COUNTRY_CODE_RE, PHONE_NUMBER_RE, validate_dob, validate_person_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassengerType {
    Infant,
    Child,
    Adult,
}

impl PassengerType {
    /// Checks a completed-years age against the fare type.
    pub fn check_age(self, age: i32) -> Result<(), &'static str> {
        match self {
            PassengerType::Infant if !(0..2).contains(&age) => {
                Err("Infant must be under 2 years old")
            }
            PassengerType::Child if !(2..12).contains(&age) => {
                Err("Child must be between 2 and 11 years old")
            }
            PassengerType::Adult if age < 12 => Err("Adult must be 12 years or older"),
            _ => Ok(()),
        }
    }
}

/// Age in completed years on `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "super::lenient_date")]
    pub dob: NaiveDate,
    #[serde(rename = "type")]
    pub passenger_type: PassengerType,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePassengerRequest {
    #[validate(custom = "validate_person_name")]
    pub name: String,
    #[validate(custom = "validate_dob")]
    pub dob: String,
    #[serde(rename = "type")]
    pub passenger_type: PassengerType,
    #[validate(email(message = "Invalid email format"))]
    pub email_id: Option<String>,
    #[validate(regex(
        path = "COUNTRY_CODE_RE",
        message = "Country code must start with + and contain 1-4 digits"
    ))]
    pub country_code: Option<String>,
    #[validate(regex(path = "PHONE_NUMBER_RE", message = "Phone number must contain 10-15 digits"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "User ID is required"))]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePassengerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_person_name")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_dob")]
    pub dob: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub passenger_type: Option<PassengerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = "COUNTRY_CODE_RE",
        message = "Country code must start with + and contain 1-4 digits"
    ))]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = "PHONE_NUMBER_RE", message = "Phone number must contain 10-15 digits"))]
    pub phone_number: Option<String>,
}

impl UpdatePassengerRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dob.is_none()
            && self.passenger_type.is_none()
            && self.email_id.is_none()
            && self.country_code.is_none()
            && self.phone_number.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn age_counts_completed_years() {
        let today = d(2025, 6, 15);
        assert_eq!(age_on(d(2000, 6, 15), today), 25);
        assert_eq!(age_on(d(2000, 6, 16), today), 24);
        assert_eq!(age_on(d(2000, 7, 1), today), 24);
        assert_eq!(age_on(d(2025, 1, 1), today), 0);
    }

    #[test]
    fn age_bands() {
        assert!(PassengerType::Infant.check_age(1).is_ok());
        assert!(PassengerType::Infant.check_age(2).is_err());
        assert!(PassengerType::Child.check_age(2).is_ok());
        assert!(PassengerType::Child.check_age(11).is_ok());
        assert!(PassengerType::Child.check_age(12).is_err());
        assert!(PassengerType::Adult.check_age(12).is_ok());
        assert!(PassengerType::Adult.check_age(11).is_err());
    }

    #[test]
    fn reads_timestamp_dob_from_database() {
        let row = serde_json::json!({
            "id": 4,
            "name": "Asha",
            "dob": "1990-04-02T00:00:00+00:00",
            "type": "adult",
            "user_id": "u1"
        });
        let p: Passenger = serde_json::from_value(row).unwrap();
        assert_eq!(p.dob, d(1990, 4, 2));
        assert_eq!(p.passenger_type, PassengerType::Adult);
    }

    #[test]
    fn contact_fields_follow_patterns() {
        let req: CreatePassengerRequest = serde_json::from_value(serde_json::json!({
            "name": "Asha Rao",
            "dob": "1990-01-01",
            "type": "adult",
            "user_id": "u1",
            "country_code": "91",
            "phone_number": "98765"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("country_code"));
        assert!(fields.contains_key("phone_number"));

        let patch = UpdatePassengerRequest {
            country_code: Some("+91".to_string()),
            phone_number: Some("9876543210".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }
}
