//! Public liveness and feature-flag report.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::config::Features;

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    /// Flags for collaborators outside this core (assistant, theming).
    pub features: Features,
}

pub async fn handler(State(state): State<AppState>) -> Json<Response> {
    Json(Response {
        status: "ok".to_owned(),
        timestamp: Utc::now(),
        version: state.config.version().to_owned(),
        features: state.config.features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    #[sqlx::test]
    async fn test_health_requires_no_identity(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response =
            make_request(app, Method::GET, "/health", None, String::default())
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.status, "ok");
        assert!(body.timestamp <= Utc::now());
    }
}
