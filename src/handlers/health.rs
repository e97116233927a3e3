use actix_web::{web, HttpResponse};
use log::warn;
use serde::Serialize;
use crate::db::ExerciseStore;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreHealthResponse {
    is_db_ok: bool,
}

// GET /is-db-ok
pub async fn is_db_ok(store: web::Data<dyn ExerciseStore>) -> HttpResponse {
    let is_db_ok = match store.ping().await {
        Ok(()) => true,
        Err(err) => {
            warn!("Store health check failed: {}", err);
            false
        }
    };
    HttpResponse::Ok().json(StoreHealthResponse { is_db_ok })
}
