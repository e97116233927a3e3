pub mod exercise;
pub mod health;
pub mod user;


use actix_cors::Cors;
use actix_web::{web, HttpResponse};
use crate::errors::AppError;

/// Registers every route. The store is expected as `web::Data<dyn ExerciseStore>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::resource("/is-db-ok")
            .route(web::get().to(health::is_db_ok)),
    )
    .service(
        web::resource("/api/exercise/new-user")
            .route(web::post().to(user::create_user)),
    )
    .service(
        web::resource("/api/exercise/users")
            .route(web::get().to(user::list_users)),
    )
    .service(
        web::resource("/api/exercise/add")
            .route(web::post().to(exercise::add_exercise)),
    )
    .service(
        web::resource("/api/exercise/log")
            .route(web::get().to(exercise::get_log)),
    )
    .default_service(web::to(not_found));
}

/// Cross-origin access for browser clients: any origin, method and header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("not found")
}
