use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;
use validator::Validate;
use crate::db::ExerciseStore;
use crate::errors::AppError;
use crate::utils::payload::JsonOrForm;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(required(message = "Path `username` is required."))]
    #[validate(length(min = 1, message = "Path `username` is required."))]
    username: Option<String>,
}

// POST /api/exercise/new-user
pub async fn create_user(
    store: web::Data<dyn ExerciseStore>,
    payload: JsonOrForm<NewUserRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    validate_payload(&payload)?;

    let username = payload.username
        .ok_or_else(|| AppError::BadRequest("Path `username` is required.".to_string()))?;

    let user = store.create_user(&username).await?;
    info!("Created user {} ({})", user.username, user.user_id);

    Ok(HttpResponse::Ok().json(user))
}

// GET /api/exercise/users
pub async fn list_users(store: web::Data<dyn ExerciseStore>) -> Result<HttpResponse, AppError> {
    let users = store.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}
