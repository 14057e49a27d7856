//! Identities owned by the external identity provider.
//!
//! This core only reads them; creation and updates happen inside the
//! provider's own adapter.

mod repository;

pub use repository::*;
#[cfg(test)]
pub(crate) use repository::tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One identity joined with its ledger aggregates.
///
/// The identity columns come straight from the provider-owned table; the
/// email is the sole authorization key, so two identities sharing one are
/// indistinguishable to the gate. Identities with zero sessions or zero
/// activity still appear, with zero counts and null timestamps.
#[derive(
    Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
#[serde(rename_all = "camelCase")]
pub struct UserWithStats {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_sessions: i64,
    pub last_sign_in: Option<DateTime<Utc>>,
    pub total_activity: i64,
    pub last_activity: Option<DateTime<Utc>>,
}
