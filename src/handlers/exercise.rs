use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::debug;
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use std::borrow::Cow;
use validator::{Validate, ValidationError};
use crate::db::ExerciseStore;
use crate::errors::AppError;
use crate::models::{exercise::Exercise, log_filter::LogFilter, user::User};
use crate::utils::payload::JsonOrForm;
use crate::utils::validation::{parse_date, parse_user_id, validate_payload};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddExerciseRequest {
    user_id: Option<String>,

    #[validate(required(message = "Path `description` is required."))]
    #[validate(length(min = 1, message = "Path `description` is required."))]
    description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_minutes")]
    #[validate(required(message = "Path `duration` is required."))]
    #[validate(custom = "validate_positive_minutes")]
    duration: Option<f64>,

    date: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Minutes {
    Number(f64),
    Text(String),
}

// Form bodies carry every value as text, JSON bodies may carry a number.
fn deserialize_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<Minutes>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Minutes::Number(minutes)) => Ok(Some(minutes)),
        Some(Minutes::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Minutes::Text(text)) => text.trim().parse().map(Some).map_err(|_| {
            de::Error::custom(format!("Cast to Number failed for value \"{}\" at path \"duration\"", text))
        }),
    }
}

fn validate_positive_minutes(minutes: f64) -> Result<(), ValidationError> {
    if minutes.is_finite() && minutes > 0.0 {
        return Ok(());
    }
    let mut err = ValidationError::new("positive");
    err.message = Some(Cow::from("Path `duration` must be a positive number of minutes."));
    Err(err)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    user_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
    limit: Option<String>,
}

impl LogQuery {
    /// Empty parameters (`?from=`) count as absent.
    fn filter(&self) -> Result<LogFilter, AppError> {
        LogFilter::classify(present(&self.from), present(&self.to), present(&self.limit)).parse()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LogResponse {
    username: String,
    id: Uuid,
    exercise_log: Vec<Exercise>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_exercise_count: Option<usize>,
}

impl LogResponse {
    fn without_total(user: User) -> Self {
        Self {
            username: user.username,
            id: user.user_id,
            exercise_log: user.exercise_log,
            total_exercise_count: None,
        }
    }

    /// Shapes a fetched user for the filter that produced it.
    pub fn shape(user: User, filter: &LogFilter) -> Self {
        let total = filter.reports_total().then(|| user.exercise_log.len());
        Self {
            total_exercise_count: total,
            ..Self::without_total(user)
        }
    }
}

fn unknown_user(user_id: Uuid) -> AppError {
    AppError::NotFound(format!("unknown userId: {}", user_id))
}

/// Runs one filtered lookup and shapes the response. A missing user is an
/// error for every filter.
pub async fn execute_log_query(
    store: &dyn ExerciseStore,
    user_id: Uuid,
    filter: &LogFilter,
) -> Result<LogResponse, AppError> {
    let user = store
        .fetch_log(user_id, filter)
        .await?
        .ok_or_else(|| unknown_user(user_id))?;

    debug!("Fetched {} log for user {}", filter.strategy(), user_id);
    Ok(LogResponse::shape(user, filter))
}

// POST /api/exercise/add
pub async fn add_exercise(
    store: web::Data<dyn ExerciseStore>,
    payload: JsonOrForm<AddExerciseRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    validate_payload(&payload)?;

    let user_id = parse_user_id(payload.user_id.as_deref())?;

    // Missing or blank dates default to now.
    let date = match payload.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => parse_date(date)?,
        None => Utc::now(),
    };

    let (Some(description), Some(duration)) = (payload.description, payload.duration) else {
        return Err(AppError::BadRequest("Path `description` is required.".to_string()));
    };

    let user = store
        .append_exercise(user_id, Exercise { description, duration, date })
        .await?
        .ok_or_else(|| unknown_user(user_id))?;

    Ok(HttpResponse::Ok().json(LogResponse::without_total(user)))
}

// GET /api/exercise/log
pub async fn get_log(
    store: web::Data<dyn ExerciseStore>,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(query.user_id.as_deref())?;
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(err) => {
            // An unknown user is reported ahead of a malformed filter.
            store.find_user(user_id).await?.ok_or_else(|| unknown_user(user_id))?;
            return Err(err);
        }
    };

    let response = execute_log_query(store.get_ref(), user_id, &filter).await?;
    Ok(HttpResponse::Ok().json(response))
}
