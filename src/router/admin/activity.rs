//! Time-windowed, typed view over the activity ledger.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::activity::{ActivityEvent, ActivityFilter};
use crate::error::Result;
use crate::router::clamp_page;

const DEFAULT_LIMIT: i64 = 100;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub user_id: Option<String>,
    pub activity_type: Option<String>,
    /// Trailing window in days; 30 when absent.
    pub days: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub activities: Vec<ActivityEvent>,
}

pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Response>> {
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let activities = state
        .activity
        .list(
            ActivityFilter {
                user_id: params.user_id.as_deref(),
                activity_type: params.activity_type.as_deref(),
                since_days: params.days,
            },
            limit,
            offset,
        )
        .await?;

    Ok(Json(Response { activities }))
}
