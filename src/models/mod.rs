mod booking;
mod flight;
mod passenger;

pub use booking::*;
pub use flight::*;
pub use passenger::*;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::validation::parse_date;

// Dates may come back from the database as a bare date or a full timestamp
fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}
