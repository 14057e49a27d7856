//! Joined per-user statistics across identity and both ledgers.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::identity::UserWithStats;

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub users: Vec<UserWithStats>,
}

pub async fn handler(
    State(state): State<AppState>,
) -> Result<Json<Response>> {
    let users = state.identities.list_with_stats().await?;
    Ok(Json(Response { users }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::tests::seed_identity;
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    #[sqlx::test]
    async fn test_users_with_stats_includes_idle_identity(
        pool: Pool<Postgres>,
    ) {
        let state = router::state(pool.clone());

        seed_identity(&pool, "user-idle", "a@x.com").await;
        seed_identity(&pool, "user-busy", "admin@x.com").await;
        state
            .sessions
            .record_sign_in("user-busy", "admin@x.com", None, None)
            .await
            .unwrap();
        state
            .activity
            .record("user-busy", "habit_created", None)
            .await
            .unwrap();

        let response = make_request(
            app(state),
            Method::GET,
            "/admin/users",
            Some("admin@x.com"),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.users.len(), 2);

        let idle = body
            .users
            .iter()
            .find(|u| u.id == "user-idle")
            .expect("outer join must keep idle identities");
        assert_eq!(idle.total_sessions, 0);
        assert_eq!(idle.last_sign_in, None);
        assert_eq!(idle.total_activity, 0);
        assert_eq!(idle.last_activity, None);

        let busy = body.users.iter().find(|u| u.id == "user-busy").unwrap();
        assert_eq!(busy.total_sessions, 1);
        assert!(busy.last_sign_in.is_some());
        assert_eq!(busy.total_activity, 1);
        assert!(busy.last_activity.is_some());
    }
}
