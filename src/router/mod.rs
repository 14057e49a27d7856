//! HTTP surface: sign-in completion, the reactive access check, admin
//! ledger queries and health.

pub mod access;
pub mod admin;
pub mod health;
pub mod sessions;

use axum::extract::{FromRequest, Request, State};
use axum::http::HeaderName;
use axum::response::Response;
use axum::{Json, middleware};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::Result;
use crate::{AppState, ServerError};

/// Trusted header carrying the caller's email, set by upstream middleware
/// after provider authentication. The sole identity resolution mechanism.
pub const IDENTITY_HEADER: HeaderName =
    HeaderName::from_static("x-warden-email");

/// Upper bound applied to every `limit` query parameter.
pub const MAX_PAGE_SIZE: i64 = 500;

/// Resolved caller identity, inserted by the [`auth`] middleware.
#[derive(Clone, Debug)]
pub struct Caller {
    pub email: String,
    pub is_admin: bool,
}

/// Authentication middleware for every non-public route.
///
/// Only resolves who is calling; allowlist enforcement stays at its two
/// call sites (sign-in completion and the `/access` re-check) so neither
/// can lean on a decision taken here.
pub async fn auth(
    State(state): State<AppState>,
    mut req: Request,
    next: middleware::Next,
) -> Result<Response> {
    let email = match req
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|header| header.to_str().ok())
        .map(str::trim)
        .filter(|email| !email.is_empty())
    {
        Some(email) => email.to_owned(),
        None => return Err(ServerError::Unauthenticated),
    };

    let is_admin = state.gate.is_administrator(&email);
    req.extensions_mut().insert(Caller { email, is_admin });

    Ok(next.run(req).await)
}

/// JSON body extractor running `validator` rules before the handler.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Valid(value))
    }
}

/// Clamp caller-supplied pagination bounds.
pub(crate) fn clamp_page(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_PAGE_SIZE), offset.max(0))
}

#[cfg(test)]
pub(crate) fn state(pool: sqlx::PgPool) -> AppState {
    use std::sync::Arc;

    use crate::activity::ActivityRepository;
    use crate::config::Configuration;
    use crate::database::Database;
    use crate::gate::Gate;
    use crate::identity::IdentityRepository;
    use crate::session::SessionRepository;

    let config = Arc::new(Configuration {
        name: "warden-test".into(),
        allowlist: vec!["a@x.com".into(), "admin@x.com".into()],
        administrators: vec!["admin@x.com".into()],
        ..Default::default()
    });

    AppState {
        gate: Arc::new(Gate::new(&config)),
        config,
        sessions: SessionRepository::new(pool.clone()),
        activity: ActivityRepository::new(pool.clone()),
        identities: IdentityRepository::new(pool.clone()),
        db: Database { postgres: pool },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_are_clamped() {
        assert_eq!(clamp_page(100, 0), (100, 0));
        assert_eq!(clamp_page(0, -5), (1, 0));
        assert_eq!(clamp_page(10_000, 3), (MAX_PAGE_SIZE, 3));
    }
}
