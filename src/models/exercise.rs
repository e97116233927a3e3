use serde::{Deserialize, Serialize, Serializer};
use chrono::{DateTime, Utc};

/// One entry of a user's log. Duration is in minutes and may be fractional.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub description: String,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: f64,
    pub date: DateTime<Utc>,
}

// Whole durations are written as integers (`30`, not `30.0`).
fn serialize_duration<S: Serializer>(duration: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let whole = duration.fract() == 0.0 && duration.abs() < i64::MAX as f64;
    if whole {
        serializer.serialize_i64(*duration as i64)
    } else {
        serializer.serialize_f64(*duration)
    }
}
