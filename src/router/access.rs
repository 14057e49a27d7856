//! Reactive access re-check: the client-side gate call site.
//!
//! The front-end calls this on every authenticated context load. It does
//! not trust the sign-in path's earlier decision: a session issued before
//! an allowlist change is told to terminate itself here.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::gate::Decision;
use crate::router::Caller;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub allowed: bool,
    /// The evaluated address, echoed back so a denied screen can name it.
    pub email: String,
    /// When `true`, the client must end its provider session and stop
    /// rendering authenticated content.
    pub force_sign_out: bool,
    pub reason: Option<String>,
}

pub async fn handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Json<Response> {
    match state.gate.evaluate(Some(&caller.email)) {
        Decision::Allow => Json(Response {
            allowed: true,
            email: caller.email,
            force_sign_out: false,
            reason: None,
        }),
        Decision::Deny { reason } => Json(Response {
            allowed: false,
            email: caller.email,
            force_sign_out: true,
            reason: Some(reason),
        }),
    }
}
