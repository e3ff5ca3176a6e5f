use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::validation::{validate_passenger_ids, validate_seat_numbers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingType {
    OneWay,
    RoundTrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Processing,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Netbanking,
    Wallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingSource {
    Web,
    Mobile,
    Agent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialRequests {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub user_id: String,
    pub flight_id: i64,
    pub booking_type: BookingType,
    pub passenger_info: Vec<i64>,
    pub payment_status: PaymentStatus,
    pub total_price: f64,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub seat_numbers: Value,
    #[serde(default)]
    pub special_requests: Option<SpecialRequests>,
    pub booking_source: BookingSource,
    #[serde(default)]
    pub promocode_used: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "User ID is required"))]
    pub user_id: String,
    #[validate(range(min = 1, message = "Flight ID must be a positive integer"))]
    pub flight_id: i64,
    pub booking_type: BookingType,
    #[validate(
        length(min = 1, max = 9, message = "Between 1 and 9 passengers allowed per booking"),
        custom = "validate_passenger_ids"
    )]
    pub passenger_info: Vec<i64>,
    pub payment_method: PaymentMethod,
    #[validate(custom = "validate_seat_numbers")]
    pub seat_numbers: Value,
    pub special_requests: Option<SpecialRequests>,
    pub booking_source: BookingSource,
    #[validate(length(max = 50, message = "Promocode must be 50 characters or less"))]
    pub promocode_used: Option<String>,
    #[validate(range(min = 0.0, message = "Total price must be a positive number"))]
    pub total_price: Option<f64>,
}

/// Row written on booking creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub user_id: String,
    pub flight_id: i64,
    pub booking_type: BookingType,
    pub passenger_info: Vec<i64>,
    pub payment_status: PaymentStatus,
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    pub seat_numbers: Value,
    pub special_requests: SpecialRequests,
    pub booking_source: BookingSource,
    pub promocode_used: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBookingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_numbers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<SpecialRequests>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Promocode must be 50 characters or less"))]
    pub promocode_used: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserBookingsQuery {
    pub user_id: Option<String>,
}

// GET /admin/all?limit=&offset=
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enum_wire_names() {
        assert_eq!(serde_json::to_value(BookingType::RoundTrip).unwrap(), json!("round-trip"));
        assert_eq!(serde_json::to_value(PaymentMethod::Netbanking).unwrap(), json!("netbanking"));
        let s: PaymentStatus = serde_json::from_value(json!("confirmed")).unwrap();
        assert_eq!(s, PaymentStatus::Confirmed);
    }

    #[test]
    fn rejects_too_many_passengers() {
        let req: CreateBookingRequest = serde_json::from_value(json!({
            "user_id": "u1",
            "flight_id": 1,
            "booking_type": "one-way",
            "passenger_info": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            "payment_method": "card",
            "seat_numbers": {},
            "booking_source": "web"
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn partial_update_serializes_only_set_fields() {
        let patch = UpdateBookingRequest {
            payment_status: Some(PaymentStatus::Confirmed),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"payment_status": "confirmed"})
        );
    }
}
