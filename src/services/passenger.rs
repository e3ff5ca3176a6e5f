use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use super::PASSENGERS;
use crate::db::{Database, Query, decode, decode_all, encode};
use crate::error::ApiError;
use crate::models::{
    CreatePassengerRequest, Passenger, PassengerType, UpdatePassengerRequest, age_on,
};
use crate::validation::parse_date;

#[derive(Debug, Serialize)]
struct NewPassenger {
    name: String,
    dob: NaiveDate,
    #[serde(rename = "type")]
    passenger_type: PassengerType,
    user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    created_at: DateTime<Utc>,
}

fn dob_of(raw: &str) -> Result<NaiveDate, ApiError> {
    parse_date(raw).ok_or_else(|| ApiError::BadRequest("Invalid date format".to_string()))
}

pub fn check_age(dob: NaiveDate, kind: PassengerType, today: NaiveDate) -> Result<(), ApiError> {
    kind.check_age(age_on(dob, today))
        .map_err(|msg| ApiError::BadRequest(msg.to_string()))
}

pub async fn create_passenger(
    db: &dyn Database,
    req: CreatePassengerRequest,
) -> Result<Passenger, ApiError> {
    let now = Utc::now();
    let dob = dob_of(&req.dob)?;
    check_age(dob, req.passenger_type, now.date_naive())?;

    let row = NewPassenger {
        name: req.name,
        dob,
        passenger_type: req.passenger_type,
        user_id: req.user_id,
        email_id: req.email_id,
        country_code: req.country_code,
        phone_number: req.phone_number,
        created_at: now,
    };
    let passenger: Passenger = decode(db.insert(PASSENGERS, encode(&row)?).await?)?;
    info!(passenger_id = passenger.id, "passenger created");
    Ok(passenger)
}

pub async fn passengers_for_user(db: &dyn Database, user_id: &str) -> Result<Vec<Passenger>, ApiError> {
    let rows = db.query(PASSENGERS, &Query::new().eq("user_id", user_id)).await?;
    let passengers: Vec<Passenger> = decode_all(rows)?;
    info!(user_id, count = passengers.len(), "passengers fetched");
    Ok(passengers)
}

pub async fn find_passenger(db: &dyn Database, id: i64) -> Result<Option<Passenger>, ApiError> {
    let rows = db.query(PASSENGERS, &Query::new().eq("id", id)).await?;
    Ok(decode_all(rows)?.into_iter().next())
}

pub async fn get_passenger(db: &dyn Database, id: i64) -> Result<Passenger, ApiError> {
    find_passenger(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Passenger not found".to_string()))
}

pub async fn update_passenger(
    db: &dyn Database,
    id: i64,
    req: UpdatePassengerRequest,
) -> Result<Passenger, ApiError> {
    if req.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one field must be provided for update".to_string(),
        ));
    }

    let existing = get_passenger(db, id).await?;

    // a new dob or type has to still agree with each other
    if req.dob.is_some() || req.passenger_type.is_some() {
        let dob = match req.dob.as_deref() {
            Some(raw) => dob_of(raw)?,
            None => existing.dob,
        };
        let kind = req.passenger_type.unwrap_or(existing.passenger_type);
        check_age(dob, kind, Utc::now().date_naive())?;
    }

    let mut patch = encode(&req)?;
    if let (Some(raw), Some(obj)) = (req.dob.as_deref(), patch.as_object_mut()) {
        obj.insert("dob".to_string(), encode(&dob_of(raw)?)?);
    }

    let row = db
        .update_by_field(PASSENGERS, "id", &id.to_string(), patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Passenger not found".to_string()))?;
    info!(passenger_id = id, "passenger updated");
    Ok(decode(row)?)
}

pub async fn delete_passenger(db: &dyn Database, id: i64) -> Result<(), ApiError> {
    get_passenger(db, id).await?;
    db.delete_by_field(PASSENGERS, "id", &id.to_string()).await?;
    info!(passenger_id = id, "passenger deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_mismatch_is_bad_request() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let dob = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(check_age(dob, PassengerType::Child, today).is_ok());
        let err = check_age(dob, PassengerType::Adult, today).unwrap_err();
        assert_eq!(err.to_string(), "Adult must be 12 years or older");
    }
}
