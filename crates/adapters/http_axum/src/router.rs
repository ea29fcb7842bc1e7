//! Axum router assembly.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use clima_app::ports::DecisionHistory;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the liveness endpoints at the root and nests the JSON API under
/// `/api`. Includes a [`TraceLayer`] that logs each HTTP request/response at
/// the `DEBUG` level using the `tracing` ecosystem.
pub fn build<H>(state: AppState<H>) -> Router
where
    H: DecisionHistory + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/status", get(status::<H>))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "clima decision core running"
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn status<H>(State(state): State<AppState<H>>) -> Json<StatusBody>
where
    H: DecisionHistory + Send + Sync + 'static,
{
    Json(StatusBody {
        status: "running",
        service: state.service,
        version: state.version,
    })
}
