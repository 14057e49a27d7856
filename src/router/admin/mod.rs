//! Administrator-only ledger queries.

mod activity;
mod sessions;
mod users;

use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Router, middleware};

use crate::error::Result;
use crate::gate::Decision;
use crate::router::Caller;
use crate::{AppState, ServerError};

/// Gate every admin query behind the allowlist plus the stricter
/// administrator check. An allowlisted non-administrator is rejected with
/// a distinct forbidden outcome, not an unauthenticated one.
async fn require_admin(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    req: Request,
    next: middleware::Next,
) -> Result<Response> {
    if let Decision::Deny { reason } = state.gate.evaluate(Some(&caller.email))
    {
        return Err(ServerError::AccessDenied { reason });
    }
    if !caller.is_admin {
        return Err(ServerError::Forbidden {
            email: caller.email,
        });
    }

    Ok(next.run(req).await)
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `GET /admin/sessions` goes to the session ledger.
        .route("/sessions", get(sessions::handler))
        // `GET /admin/activity` goes to the activity ledger.
        .route("/activity", get(activity::handler))
        // `GET /admin/users` goes to the joined aggregation.
        .route("/users", get(users::handler))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
