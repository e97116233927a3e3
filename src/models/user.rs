use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::exercise::Exercise;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub username: String,
    #[serde(rename = "id")]
    pub user_id: Uuid,
}

/// A user together with (a possibly filtered view of) their exercise log.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub exercise_log: Vec<Exercise>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            user_id: Uuid::now_v7(),
            username: username.into(),
            exercise_log: Vec::new(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            user_id: self.user_id,
        }
    }
}
