use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};
use crate::errors::AppError;

/// Validates a request body, reporting only the first failing field.
/// Fields are visited in name order so the reported message is stable.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate()
        .map_err(|err| AppError::BadRequest(first_error_message(&err)))
}

fn first_error_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |err| (field, err)))
        .map(|(field, err)| match &err.message {
            Some(message) => message.to_string(),
            None => format!("Path `{}` is invalid.", field),
        })
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, AppError> {
    let value = value.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid date format: {}", value)))
}

pub fn parse_limit(value: &str) -> Result<usize, AppError> {
    value.trim()
        .parse::<usize>()
        .map_err(|_| AppError::BadRequest(format!("Invalid limit: {} is not a non-negative integer", value)))
}

// Identifiers that cannot be UUIDs can never match a stored user.
pub fn parse_user_id(value: Option<&str>) -> Result<Uuid, AppError> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::NotFound("unknown userId".to_string()))?;

    Uuid::parse_str(value)
        .map_err(|_| AppError::NotFound(format!("unknown userId: {}", value)))
}
