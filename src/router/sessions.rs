//! Sign-in completion: the authoritative, server-side gate call site.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::gate::Decision;
use crate::router::{Caller, Valid};
use crate::session::SessionRecord;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    #[validate(length(min = 1, message = "User id is required."))]
    pub user_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub session: SessionRecord,
}

/// Handler to complete a sign-in.
///
/// The identity provider calls back here with the candidate identity. The
/// gate runs before anything is persisted: on deny, no session row exists
/// and the reason names the rejected address. The stored email is the
/// candidate's verbatim casing.
pub async fn handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    if let Decision::Deny { reason } = state.gate.evaluate(Some(&body.email))
    {
        return Err(crate::ServerError::AccessDenied { reason });
    }

    let session = state
        .sessions
        .record_sign_in(
            &body.user_id,
            &body.email,
            body.ip_address.as_deref(),
            body.user_agent.as_deref(),
        )
        .await?;

    // Sign-in instrumentation. A ledger miss here must not undo the
    // sign-in itself.
    if let Err(err) = state
        .activity
        .record(
            &body.user_id,
            "sign_in",
            Some(serde_json::json!({
                "ipAddress": body.ip_address,
                "userAgent": body.user_agent,
                "recordedBy": caller.email,
            })),
        )
        .await
    {
        tracing::error!(
            user_id = body.user_id,
            error = err.to_string(),
            "sign-in activity not recorded"
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(Response {
            success: true,
            session,
        }),
    ))
}
