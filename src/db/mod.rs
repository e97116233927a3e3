//! Persistence port for users and their exercise logs, plus its adapters.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use thiserror::Error;
use uuid::Uuid;

use crate::config::StoreBackend;
use crate::models::{exercise::Exercise, log_filter::LogFilter, user::{User, UserSummary}};

pub use memory::MemoryExerciseStore;
pub use postgres::PgExerciseStore;

/// Failures raised by a store adapter. A missing user is not an error;
/// lookups report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),
    #[error("store query failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Create a user with an empty log.
    async fn create_user(&self, username: &str) -> Result<UserSummary, StoreError>;

    /// All users in creation order, without their logs.
    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError>;

    /// Append one entry and return the user with the updated log.
    async fn append_exercise(&self, user_id: Uuid, exercise: Exercise) -> Result<Option<User>, StoreError>;

    /// Fetch a user with their log narrowed by `filter`: range first, then limit.
    async fn fetch_log(&self, user_id: Uuid, filter: &LogFilter) -> Result<Option<User>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        self.fetch_log(user_id, &LogFilter::Unfiltered).await
    }
}

/// Build the store selected by configuration. Postgres schemas are migrated before use.
pub async fn connect(backend: &StoreBackend) -> Result<Arc<dyn ExerciseStore>, StoreError> {
    match backend {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryExerciseStore::default()))
        }
        StoreBackend::Postgres { database_url, max_connections } => {
            let store = PgExerciseStore::connect(database_url, *max_connections).await?;
            store.migrate().await?;
            info!("Connected to PostgreSQL store");
            Ok(Arc::new(store))
        }
    }
}
