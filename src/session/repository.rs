//! Handle database requests for the session ledger.

use sqlx::{Pool, Postgres};
use validator::{ValidationError, ValidationErrors};

use crate::error::Result;
use crate::session::SessionRecord;

const COLUMNS: &str =
    "id, user_id, email, sign_in_at, ip_address, user_agent, is_active";

fn missing_field(field: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        ValidationError::new("required")
            .with_message(format!("`{field}` must not be empty.").into()),
    );
    errors
}

#[derive(Clone)]
pub struct SessionRepository {
    pool: Pool<Postgres>,
}

impl SessionRepository {
    /// Create a new [`SessionRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append one sign-in event and return the stored row.
    ///
    /// `user_id` and `email` are required; nothing is written when either
    /// is empty. The id and `sign_in_at` stamp are generator-assigned.
    pub async fn record_sign_in(
        &self,
        user_id: &str,
        email: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<SessionRecord> {
        if user_id.trim().is_empty() {
            return Err(missing_field("user_id").into());
        }
        if email.trim().is_empty() {
            return Err(missing_field("email").into());
        }

        let query = format!(
            r#"INSERT INTO sessions (user_id, email, ip_address, user_agent)
                VALUES ($1, $2, $3, $4)
                RETURNING {COLUMNS}"#,
        );

        let session = sqlx::query_as::<_, SessionRecord>(&query)
            .bind(user_id)
            .bind(email)
            .bind(ip_address)
            .bind(user_agent)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(
            session_id = session.id,
            user_id,
            "sign-in recorded"
        );

        Ok(session)
    }

    /// List sign-in events, most recent first.
    ///
    /// `user_id` narrows to one identity; absent, the whole ledger is
    /// paginated.
    pub async fn list(
        &self,
        user_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SessionRecord>> {
        let query = format!(
            r#"SELECT {COLUMNS} FROM sessions
                WHERE ($1::text IS NULL OR user_id = $1)
                ORDER BY sign_in_at DESC, id DESC
                LIMIT $2 OFFSET $3"#,
        );

        let sessions = sqlx::query_as::<_, SessionRecord>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(sessions)
    }
}
