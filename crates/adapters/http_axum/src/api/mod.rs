//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod decisions;

use axum::Router;
use axum::routing::get;

use clima_app::ports::DecisionHistory;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H>() -> Router<AppState<H>>
where
    H: DecisionHistory + Send + Sync + 'static,
{
    Router::new().route("/decisions", get(decisions::list::<H>))
}
