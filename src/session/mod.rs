//! Append-only ledger of sign-in events.

mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sign-in event, as saved on database.
///
/// Write-once: no update or delete exists in this core, and `is_active`
/// never transitions back to `false`.
#[derive(
    Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    /// Denormalized copy of the email at sign-in time, stored verbatim.
    pub email: String,
    pub sign_in_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_active: bool,
}
