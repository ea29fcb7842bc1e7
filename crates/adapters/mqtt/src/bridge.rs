//! Event loop connecting the broker to the [`DecisionService`].

use std::sync::Arc;
use std::time::Duration;

use clima_app::decision_service::DecisionService;
use clima_app::ports::{DecisionHistory, DecisionPublisher};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, Transport};

use crate::config::MqttConfig;
use crate::error::MqttError;
use crate::payload;
use crate::publisher::MqttPublisher;
use crate::topics::Topics;

/// Capacity of the request channel between client handles and the event loop.
const REQUEST_CAPACITY: usize = 32;

/// Owns the rumqttc event loop and dispatches inbound messages.
pub struct MqttBridge {
    client: AsyncClient,
    eventloop: EventLoop,
    topics: Topics,
    reconnect_delay: Duration,
}

impl MqttBridge {
    /// Configure the client. Nothing touches the network until [`run`](Self::run).
    #[must_use]
    pub fn new(config: &MqttConfig) -> Self {
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        if let Some(username) = &config.username {
            options.set_credentials(username, config.password.as_deref().unwrap_or_default());
        }
        if config.tls {
            options.set_transport(Transport::tls_with_default_config());
        }
        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        Self {
            client,
            eventloop,
            topics: Topics::new(config.base_topic.clone()),
            reconnect_delay: Duration::from_secs(u64::from(config.reconnect_delay_secs)),
        }
    }

    /// Publisher sharing this bridge's connection.
    #[must_use]
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher::new(self.client.clone(), self.topics.clone())
    }

    /// Poll the broker forever, resubscribing after every (re)connection.
    ///
    /// Connection errors are logged and retried after the reconnect delay;
    /// rumqttc reconnects on the next poll.
    pub async fn run<P, H>(mut self, service: Arc<DecisionService<P, H>>)
    where
        P: DecisionPublisher + Send + Sync,
        H: DecisionHistory + Send + Sync,
    {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    tracing::info!("connected to MQTT broker");
                    if let Err(err) = self.subscribe().await {
                        tracing::error!(error = %err, "failed to subscribe");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    self.dispatch(&service, &publish.topic, &publish.payload).await;
                }
                Ok(_) => {}
                Err(err) => {
                    let err = MqttError::Connection(err);
                    tracing::warn!(
                        error = %err,
                        delay = ?self.reconnect_delay,
                        "MQTT connection lost"
                    );
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }

    async fn subscribe(&self) -> Result<(), MqttError> {
        for topic in self.topics.subscriptions() {
            tracing::debug!(%topic, "subscribing");
            self.client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .map_err(MqttError::Client)?;
        }
        Ok(())
    }

    async fn dispatch<P, H>(&self, service: &DecisionService<P, H>, topic: &str, bytes: &[u8])
    where
        P: DecisionPublisher + Send + Sync,
        H: DecisionHistory + Send + Sync,
    {
        let Some(kind) = self.topics.classify(topic) else {
            let err = MqttError::UnknownTopic(topic.to_string());
            tracing::debug!(error = %err, "ignoring message");
            return;
        };
        match payload::decode(kind, bytes) {
            Ok(Some(message)) => {
                service.handle(message).await;
            }
            Ok(None) => tracing::debug!(topic, "message carried nothing to apply"),
            Err(err) => tracing::warn!(error = %err, topic, "dropping malformed message"),
        }
    }
}
