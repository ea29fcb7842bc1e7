//! History port: time-series persistence for fuzzy decisions.

use std::future::Future;

use clima_domain::decision_history::DecisionRecord;
use clima_domain::error::ClimateError;

/// Append-only store of [`DecisionRecord`]s.
pub trait DecisionHistory {
    /// Persist a new record.
    fn record(
        &self,
        record: DecisionRecord,
    ) -> impl Future<Output = Result<DecisionRecord, ClimateError>> + Send;

    /// Get the most recent records, ordered newest-first.
    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<DecisionRecord>, ClimateError>> + Send;
}

impl<T: DecisionHistory + Send + Sync> DecisionHistory for std::sync::Arc<T> {
    fn record(
        &self,
        record: DecisionRecord,
    ) -> impl Future<Output = Result<DecisionRecord, ClimateError>> + Send {
        (**self).record(record)
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<DecisionRecord>, ClimateError>> + Send {
        (**self).get_recent(limit)
    }
}
