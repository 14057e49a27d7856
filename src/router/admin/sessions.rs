//! Point-in-time, paginated view over the session ledger.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::router::clamp_page;
use crate::session::SessionRecord;

const DEFAULT_LIMIT: i64 = 50;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub user_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub sessions: Vec<SessionRecord>,
}

pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<Response>> {
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let sessions = state
        .sessions
        .list(params.user_id.as_deref(), limit, offset)
        .await?;

    Ok(Json(Response { sessions }))
}
