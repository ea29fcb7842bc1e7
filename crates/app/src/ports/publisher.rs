//! Publisher port: hands cycle results to the transport.

use std::future::Future;

use clima_domain::error::ClimateError;
use clima_domain::message::Outbound;

/// Delivers [`Outbound`] messages to whoever listens (broker, log, …).
pub trait DecisionPublisher {
    /// Publish one message.
    fn publish(&self, message: Outbound) -> impl Future<Output = Result<(), ClimateError>> + Send;
}

impl<T: DecisionPublisher + Send + Sync> DecisionPublisher for std::sync::Arc<T> {
    fn publish(&self, message: Outbound) -> impl Future<Output = Result<(), ClimateError>> + Send {
        (**self).publish(message)
    }
}
