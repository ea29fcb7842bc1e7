//! [`DecisionPublisher`] backed by an rumqttc client.

use std::future::Future;

use clima_app::ports::DecisionPublisher;
use clima_domain::error::ClimateError;
use clima_domain::message::Outbound;
use rumqttc::{AsyncClient, QoS};

use crate::error::MqttError;
use crate::payload;
use crate::topics::Topics;

/// Publishes decision messages with QoS 1, never retained.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    topics: Topics,
}

impl MqttPublisher {
    #[must_use]
    pub fn new(client: AsyncClient, topics: Topics) -> Self {
        Self { client, topics }
    }

    async fn send(&self, message: Outbound) -> Result<(), MqttError> {
        let (topic, bytes) = payload::encode(&self.topics, &message)?;
        tracing::debug!(%topic, kind = message.kind(), "publishing");
        self.client
            .publish(topic, QoS::AtLeastOnce, false, bytes)
            .await
            .map_err(MqttError::Client)
    }
}

impl DecisionPublisher for MqttPublisher {
    fn publish(&self, message: Outbound) -> impl Future<Output = Result<(), ClimateError>> + Send {
        async move { self.send(message).await.map_err(ClimateError::from) }
    }
}
