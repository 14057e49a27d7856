//! Handle database requests for the activity ledger.

use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres};

use crate::activity::{ActivityEvent, ActivityFilter};
use crate::error::Result;

/// Trailing window applied when the caller does not pick one.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

const COLUMNS: &str = "id, user_id, activity_type, created_at, metadata";

#[derive(Clone)]
pub struct ActivityRepository {
    pool: Pool<Postgres>,
}

impl ActivityRepository {
    /// Create a new [`ActivityRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append one event stamped with current time.
    ///
    /// Producers are assumed already-authenticated; no allowlist re-check
    /// happens here.
    pub async fn record(
        &self,
        user_id: &str,
        activity_type: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<ActivityEvent> {
        let query = format!(
            r#"INSERT INTO activity_events (user_id, activity_type, metadata)
                VALUES ($1, $2, $3)
                RETURNING {COLUMNS}"#,
        );

        let event = sqlx::query_as::<_, ActivityEvent>(&query)
            .bind(user_id)
            .bind(activity_type)
            .bind(metadata)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(
            event_id = event.id,
            user_id,
            activity_type,
            "activity recorded"
        );

        Ok(event)
    }

    /// List events inside the trailing window, most recent first.
    ///
    /// Insertion order is not trusted for ordering; the store sorts on
    /// `created_at` explicitly.
    pub async fn list(
        &self,
        filter: ActivityFilter<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEvent>> {
        let days = filter
            .since_days
            .unwrap_or(DEFAULT_WINDOW_DAYS)
            .clamp(0, 36_500);
        let since = Utc::now() - Duration::days(days);

        let query = format!(
            r#"SELECT {COLUMNS} FROM activity_events
                WHERE created_at >= $1
                AND ($2::text IS NULL OR user_id = $2)
                AND ($3::text IS NULL OR activity_type = $3)
                ORDER BY created_at DESC, id DESC
                LIMIT $4 OFFSET $5"#,
        );

        let events = sqlx::query_as::<_, ActivityEvent>(&query)
            .bind(since)
            .bind(filter.user_id)
            .bind(filter.activity_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[sqlx::test]
    async fn record_then_list_returns_newest_first(pool: Pool<Postgres>) {
        let repo = ActivityRepository::new(pool);

        repo.record("user-1", "habit_completed", None).await.unwrap();
        let newest = repo
            .record("user-1", "habit_created", Some(json!({"habit": "run"})))
            .await
            .unwrap();

        let events = repo
            .list(
                ActivityFilter {
                    user_id: Some("user-1"),
                    ..Default::default()
                },
                10,
                0,
            )
            .await
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], newest);
    }

    #[sqlx::test]
    async fn filters_are_conjunctive(pool: Pool<Postgres>) {
        let repo = ActivityRepository::new(pool);

        repo.record("user-1", "habit_created", None).await.unwrap();
        repo.record("user-1", "habit_completed", None).await.unwrap();
        repo.record("user-2", "habit_created", None).await.unwrap();

        let events = repo
            .list(
                ActivityFilter {
                    user_id: Some("user-1"),
                    activity_type: Some("habit_created"),
                    since_days: None,
                },
                10,
                0,
            )
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id, "user-1");
        assert_eq!(events[0].activity_type, "habit_created");
    }

    #[sqlx::test]
    async fn window_excludes_old_events(pool: Pool<Postgres>) {
        let repo = ActivityRepository::new(pool.clone());

        repo.record("user-1", "habit_created", None).await.unwrap();
        // backdate one event past the default 30-day window.
        sqlx::query(
            r#"INSERT INTO activity_events (user_id, activity_type, created_at)
                VALUES ($1, $2, NOW() - INTERVAL '45 days')"#,
        )
        .bind("user-1")
        .bind("habit_created")
        .execute(&pool)
        .await
        .unwrap();

        let recent = repo
            .list(ActivityFilter::default(), 10, 0)
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);

        let all = repo
            .list(
                ActivityFilter {
                    since_days: Some(60),
                    ..Default::default()
                },
                10,
                0,
            )
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
