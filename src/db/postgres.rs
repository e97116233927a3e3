use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{ExerciseStore, StoreError};
use crate::models::{exercise::Exercise, log_filter::LogFilter, user::{User, UserSummary}};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StoreError::Connection(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

pub struct PgExerciseStore {
    pool: PgPool,
}

impl PgExerciseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("migration failed: {}", e)))
    }

    async fn find_summary(&self, user_id: Uuid) -> Result<Option<UserSummary>, StoreError> {
        let summary = sqlx::query_as::<_, UserSummary>(
            "SELECT user_id, username FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(summary)
    }
}

#[async_trait]
impl ExerciseStore for PgExerciseStore {
    async fn create_user(&self, username: &str) -> Result<UserSummary, StoreError> {
        let summary = sqlx::query_as::<_, UserSummary>(
            "INSERT INTO users (user_id, username, created_at) VALUES ($1, $2, NOW()) RETURNING user_id, username",
        )
        .bind(Uuid::now_v7())
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT user_id, username FROM users ORDER BY created_at, user_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn append_exercise(&self, user_id: Uuid, exercise: Exercise) -> Result<Option<User>, StoreError> {
        // Inserting through the users table keeps "unknown user" a zero-row insert.
        let result = sqlx::query(
            "INSERT INTO exercises (user_id, description, duration, done_at)
             SELECT user_id, $2::text, $3::float8, $4::timestamptz FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(&exercise.description)
        .bind(exercise.duration)
        .bind(exercise.date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_user(user_id).await
    }

    async fn fetch_log(&self, user_id: Uuid, filter: &LogFilter) -> Result<Option<User>, StoreError> {
        let Some(summary) = self.find_summary(user_id).await? else {
            return Ok(None);
        };

        let from = filter.range().map(|range| range.from);
        let to = filter.range().map(|range| range.to);
        // LIMIT NULL is LIMIT ALL.
        let limit = filter.limit().map(|limit| i64::try_from(limit).unwrap_or(i64::MAX));

        let exercise_log = sqlx::query_as::<_, Exercise>(
            "SELECT description, duration, done_at AS date
             FROM exercises
             WHERE user_id = $1
               AND ($2::timestamptz IS NULL OR done_at >= $2)
               AND ($3::timestamptz IS NULL OR done_at <= $3)
             ORDER BY exercise_id
             LIMIT $4",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(User {
            user_id: summary.user_id,
            username: summary.username,
            exercise_log,
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(all(test, feature = "postgres-tests"))]
mod tests {
    use super::*;
    use crate::models::log_filter::DateRange;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn exercise(description: &str, duration: f64, d: u32) -> Exercise {
        Exercise {
            description: description.to_string(),
            duration,
            date: day(d),
        }
    }

    async fn alice_with_run_and_swim(store: &PgExerciseStore) -> Uuid {
        let alice = store.create_user("alice").await.unwrap();
        store.append_exercise(alice.user_id, exercise("run", 30.0, 10)).await.unwrap();
        store.append_exercise(alice.user_id, exercise("swim", 45.0, 20)).await.unwrap();
        alice.user_id
    }

    fn descriptions(user: &User) -> Vec<&str> {
        user.exercise_log.iter().map(|e| e.description.as_str()).collect()
    }

    #[sqlx::test]
    async fn filters_run_in_sql(pool: PgPool) {
        let store = PgExerciseStore::new(pool);
        let id = alice_with_run_and_swim(&store).await;

        let all = store.fetch_log(id, &LogFilter::Unfiltered).await.unwrap().unwrap();
        assert_eq!(descriptions(&all), vec!["run", "swim"]);
        assert_eq!(all.username, "alice");

        let range = LogFilter::Range(DateRange { from: day(1), to: day(15) });
        let user = store.fetch_log(id, &range).await.unwrap().unwrap();
        assert_eq!(descriptions(&user), vec!["run"]);

        let user = store.fetch_log(id, &LogFilter::Limit(1)).await.unwrap().unwrap();
        assert_eq!(descriptions(&user), vec!["run"]);

        let both = LogFilter::RangeAndLimit(DateRange { from: day(1), to: day(31) }, 1);
        let user = store.fetch_log(id, &both).await.unwrap().unwrap();
        assert_eq!(descriptions(&user), vec!["run"]);

        let inclusive = LogFilter::Range(DateRange { from: day(20), to: day(20) });
        let user = store.fetch_log(id, &inclusive).await.unwrap().unwrap();
        assert_eq!(descriptions(&user), vec!["swim"]);
    }

    #[sqlx::test]
    async fn unknown_user_is_absent_not_an_error(pool: PgPool) {
        let store = PgExerciseStore::new(pool);
        alice_with_run_and_swim(&store).await;
        let missing = Uuid::now_v7();

        assert!(store.append_exercise(missing, exercise("run", 5.0, 1)).await.unwrap().is_none());
        assert!(store.fetch_log(missing, &LogFilter::Limit(1)).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn fractional_durations_and_user_order_persist(pool: PgPool) {
        let store = PgExerciseStore::new(pool);
        let alice = store.create_user("alice").await.unwrap();
        let bob = store.create_user("bob").await.unwrap();
        assert_eq!(store.list_users().await.unwrap(), vec![alice.clone(), bob]);

        let user = store
            .append_exercise(alice.user_id, exercise("walk", 12.5, 3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.exercise_log, vec![exercise("walk", 12.5, 3)]);
        store.ping().await.unwrap();
    }
}
