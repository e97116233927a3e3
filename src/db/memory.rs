use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{ExerciseStore, StoreError};
use crate::models::{exercise::Exercise, log_filter::LogFilter, user::{User, UserSummary}};

/// Store kept in process memory. Users are held in creation order.
#[derive(Default)]
pub struct MemoryExerciseStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl ExerciseStore for MemoryExerciseStore {
    async fn create_user(&self, username: &str) -> Result<UserSummary, StoreError> {
        let user = User::new(username);
        let summary = user.summary();
        self.users.write().await.push(user);
        Ok(summary)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        Ok(self.users.read().await.iter().map(User::summary).collect())
    }

    async fn append_exercise(&self, user_id: Uuid, exercise: Exercise) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|user| user.user_id == user_id).map(|user| {
            user.exercise_log.push(exercise);
            user.clone()
        }))
    }

    async fn fetch_log(&self, user_id: Uuid, filter: &LogFilter) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.user_id == user_id).map(|user| User {
            user_id: user.user_id,
            username: user.username.clone(),
            exercise_log: filter.apply(&user.exercise_log),
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
