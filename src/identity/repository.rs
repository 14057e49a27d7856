//! Read side of the identities table, including the admin aggregation.

use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::identity::UserWithStats;

#[derive(Clone)]
pub struct IdentityRepository {
    pool: Pool<Postgres>,
}

impl IdentityRepository {
    /// Create a new [`IdentityRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Every identity joined with its per-ledger aggregates, newest
    /// identities first.
    ///
    /// One composed read: both ledgers are outer-joined and grouped in a
    /// single statement, so no torn intermediate state between them can be
    /// observed. `COUNT(DISTINCT ..)` undoes the row multiplication the
    /// double join introduces.
    pub async fn list_with_stats(&self) -> Result<Vec<UserWithStats>> {
        let users = sqlx::query_as::<_, UserWithStats>(
            r#"SELECT
                    i.id, i.email, i.name, i.avatar_url,
                    i.created_at, i.updated_at,
                    COUNT(DISTINCT s.id) AS total_sessions,
                    MAX(s.sign_in_at) AS last_sign_in,
                    COUNT(DISTINCT a.id) AS total_activity,
                    MAX(a.created_at) AS last_activity
                FROM identities i
                LEFT JOIN sessions s ON s.user_id = i.id
                LEFT JOIN activity_events a ON a.user_id = i.id
                GROUP BY i.id, i.email, i.name, i.avatar_url,
                    i.created_at, i.updated_at
                ORDER BY i.created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
