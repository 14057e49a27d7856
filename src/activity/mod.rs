//! Append-only ledger of user actions.

mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded user action, immutable once written.
///
/// `activity_type` is an open string tag: producers outside this core mint
/// new tags without a shared registry, so no closed enum exists here.
#[derive(
    Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: String,
    pub user_id: String,
    pub activity_type: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub metadata: Option<serde_json::Value>,
}

/// Filters for [`ActivityRepository::list`]. `user_id` and `activity_type`
/// are conjunctive when both present.
#[derive(Clone, Debug, Default)]
pub struct ActivityFilter<'a> {
    pub user_id: Option<&'a str>,
    pub activity_type: Option<&'a str>,
    /// Trailing window in days. Defaults to 30 when unset.
    pub since_days: Option<i64>,
}
