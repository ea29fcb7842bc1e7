//! JSON handlers for the fuzzy decision history.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use clima_app::ports::DecisionHistory;
use clima_domain::decision_history::DecisionRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Records returned when no `limit` is given.
pub const DEFAULT_LIMIT: usize = 50;
/// Upper bound on `limit`.
pub const MAX_LIMIT: usize = 500;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

impl ListParams {
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DecisionRecord>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/decisions?limit=N`: most recent decisions, newest first.
pub async fn list<H>(
    State(state): State<AppState<H>>,
    Query(params): Query<ListParams>,
) -> Result<ListResponse, ApiError>
where
    H: DecisionHistory + Send + Sync + 'static,
{
    let records = state.history.get_recent(params.effective_limit()).await?;
    Ok(ListResponse::Ok(Json(records)))
}
