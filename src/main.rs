mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod utils;

use actix_web::middleware::{Condition, Logger};
use actix_web::{web, App, HttpServer};
use actix_web_prom::PrometheusMetricsBuilder;
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use std::collections::HashMap;
use std::io;
use crate::config::AppConfig;
use crate::db::ExerciseStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    // Initialize the store; postgres schemas are migrated here
    let store = db::connect(&config.store).await.map_err(io::Error::other)?;
    let store: web::Data<dyn ExerciseStore> = web::Data::from(store);

    // Set up Prometheus metrics
    let mut labels = HashMap::new();
    labels.insert("app".to_string(), "exercise_tracker".to_string());
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .const_labels(labels)
        .build()
        .map_err(|e| io::Error::other(e.to_string()))?;

    info!(
        "Starting server at {} with {} store (metrics {})",
        config.bind_address,
        config.store.name(),
        if config.metrics_enabled { "enabled" } else { "disabled" }
    );

    let metrics_enabled = config.metrics_enabled;
    HttpServer::new(move || {
        App::new()
            .wrap(handlers::cors())
            .wrap(Logger::default())
            .wrap(Condition::new(metrics_enabled, prometheus.clone()))
            .app_data(store.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
