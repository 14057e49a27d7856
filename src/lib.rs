//! Warden gates a personal habit tracker behind a fixed email allowlist
//! and keeps two append-only audit trails: sign-in sessions and user
//! activity.

mod activity;
pub mod config;
mod database;
pub mod error;
mod gate;
mod identity;
mod router;
mod session;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, StatusCode, header};
use axum::routing::{get, post};
use axum::{Router, middleware as AxumMiddleware};
use error::ServerError;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    identity: Option<&str>,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(email) = identity {
        request = request.header(router::IDENTITY_HEADER, email);
    }

    app.oneshot(request.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub db: database::Database,
    pub gate: Arc<gate::Gate>,
    pub sessions: session::SessionRepository,
    pub activity: activity::ActivityRepository,
    pub identities: identity::IdentityRepository,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
            router::IDENTITY_HEADER,
        ]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any)
                .vary([header::AUTHORIZATION]),
        );

    let authenticated = Router::new()
        // `POST /sessions` completes a sign-in.
        .route("/sessions", post(router::sessions::handler))
        // `GET /access` re-checks the caller on every context load.
        .route("/access", get(router::access::handler))
        // `GET /admin/*` queries the ledgers. Administrator required.
        .nest("/admin", router::admin::router(state.clone()))
        .route_layer(AxumMiddleware::from_fn_with_state(
            state.clone(),
            router::auth,
        ));

    Router::new()
        // `GET /health` is the only public route.
        .route("/health", get(router::health::handler))
        .merge(authenticated)
        .with_state(state)
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state() -> Result<AppState, Box<dyn std::error::Error>>
{
    // read configuration file. let it in memory.
    let config = config::Configuration::default().read();

    let db = match config.postgres {
        Some(ref postgres) => database::Database::connect(postgres).await?,
        None => {
            tracing::error!("missing `postgres` entry on `config.yaml` file");
            std::process::exit(0);
        },
    };

    // execute migrations scripts on start.
    sqlx::migrate!().run(&db.postgres).await?;

    if config.allowlist.is_empty() {
        tracing::warn!("allowlist is empty; every sign-in will be denied");
    }
    if config.administrators.is_empty() {
        tracing::warn!("no administrator configured; ledgers are unreachable");
    }

    let gate = Arc::new(gate::Gate::new(&config));

    Ok(AppState {
        gate,
        sessions: session::SessionRepository::new(db.postgres.clone()),
        activity: activity::ActivityRepository::new(db.postgres.clone()),
        identities: identity::IdentityRepository::new(db.postgres.clone()),
        config,
        db,
    })
}
