//! Shared application state for axum handlers.

use std::sync::Arc;

use clima_app::ports::DecisionHistory;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the history type itself does not need
/// to be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<H> {
    /// Decision history for time-series queries.
    pub history: Arc<H>,
    /// Name reported by `/status`.
    pub service: &'static str,
    /// Version reported by `/status`.
    pub version: &'static str,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            history: Arc::clone(&self.history),
            service: self.service,
            version: self.version,
        }
    }
}

impl<H> AppState<H>
where
    H: DecisionHistory + Send + Sync + 'static,
{
    /// Create a new application state reporting this crate's version.
    pub fn new(history: H) -> Self {
        Self::from_arc(Arc::new(history))
    }

    /// Create a new application state from a pre-wrapped `Arc`.
    ///
    /// Use this when the history needs to be shared with the decision
    /// service before constructing the HTTP state.
    pub fn from_arc(history: Arc<H>) -> Self {
        Self {
            history,
            service: "clima",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    #[must_use]
    pub fn with_identity(mut self, service: &'static str, version: &'static str) -> Self {
        self.service = service;
        self.version = version;
        self
    }
}
