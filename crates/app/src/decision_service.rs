//! Decision service: runs one decision cycle per reading and owns the
//! controller state fed by inbound messages.

use std::sync::{Arc, PoisonError};

use clima_domain::command::{Commands, DEFAULT_ACTIVATION_THRESHOLD};
use clima_domain::decision::Decision;
use clima_domain::decision_history::DecisionRecord;
use clima_domain::error::ClimateError;
use clima_domain::fact::FactStore;
use clima_domain::message::{Inbound, Outbound};
use clima_domain::reading::{DEFAULT_SETPOINT, Reading};
use clima_domain::relay::RelayStatuses;
use clima_domain::time::now;

use crate::fuzzy_engine::FuzzyEngine;
use crate::ports::{DecisionHistory, DecisionPublisher};
use crate::rule_engine::RuleEngine;

/// Temperature assumed until the first sensor sample arrives.
pub const DEFAULT_TEMPERATURE: f64 = 24.0;
/// Humidity assumed until the first sensor sample arrives.
pub const DEFAULT_HUMIDITY: f64 = 50.0;

/// Latest values the controller knows about.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub temperature: f64,
    pub humidity: f64,
    pub setpoint: f64,
    pub relays: RelayStatuses,
    /// When `false`, no relay command, fuzzy state or history row is emitted.
    pub fuzzy_active: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            humidity: DEFAULT_HUMIDITY,
            setpoint: DEFAULT_SETPOINT,
            relays: RelayStatuses::new(),
            fuzzy_active: true,
        }
    }
}

impl ControllerState {
    #[must_use]
    pub fn reading(&self) -> Reading {
        Reading::new(self.temperature, self.humidity, self.setpoint)
    }
}

/// Orchestrates the rule engine, the fuzzy engine and the command mapper.
pub struct DecisionService<P, H> {
    rules: RuleEngine,
    fuzzy: Arc<FuzzyEngine>,
    threshold: f64,
    facts: std::sync::Mutex<FactStore>,
    state: tokio::sync::Mutex<ControllerState>,
    publisher: P,
    history: H,
}

impl<P, H> DecisionService<P, H>
where
    P: DecisionPublisher,
    H: DecisionHistory,
{
    /// Create a service with the default cascade limit and threshold.
    pub fn new(fuzzy: Arc<FuzzyEngine>, publisher: P, history: H) -> Self {
        Self {
            rules: RuleEngine::default(),
            fuzzy,
            threshold: DEFAULT_ACTIVATION_THRESHOLD,
            facts: std::sync::Mutex::new(FactStore::new()),
            state: tokio::sync::Mutex::new(ControllerState::default()),
            publisher,
            history,
        }
    }

    #[must_use]
    pub fn with_rule_engine(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    /// Power level a fuzzy output must strictly exceed to switch its relay ON.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Setpoint used until the operator sends one.
    #[must_use]
    pub fn with_setpoint(mut self, setpoint: f64) -> Self {
        self.state.get_mut().setpoint = setpoint;
        self
    }

    /// Whether the fuzzy controller drives the relays at start-up.
    #[must_use]
    pub fn with_fuzzy_active(mut self, active: bool) -> Self {
        self.state.get_mut().fuzzy_active = active;
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Snapshot of the controller state.
    pub async fn state(&self) -> ControllerState {
        self.state.lock().await.clone()
    }

    /// Evaluate both engines on one reading and map the fuzzy outputs to
    /// relay commands. Performs no IO.
    pub fn on_reading(&self, reading: Reading, relays: &RelayStatuses) -> Decision {
        let timestamp = now();
        let rules = {
            let mut facts = self.facts.lock().unwrap_or_else(PoisonError::into_inner);
            facts.populate(&reading.into(), relays);
            self.rules.evaluate_at(&mut facts, timestamp)
        };
        let fuzzy = self
            .fuzzy
            .compute(reading.temperature, reading.humidity, reading.setpoint);
        let commands =
            Commands::from_powers(fuzzy.fan, fuzzy.heater, fuzzy.humidifier, self.threshold);
        Decision {
            timestamp,
            reading,
            rules,
            fuzzy,
            commands,
        }
    }

    /// Apply an inbound message. Sensor samples trigger a full cycle whose
    /// decision is returned; other messages only update the state.
    #[tracing::instrument(skip(self, message), fields(kind = message.kind()))]
    pub async fn handle(&self, message: Inbound) -> Option<Decision> {
        match message {
            Inbound::Sensors {
                temperature,
                humidity,
            } => {
                let (reading, relays, fuzzy_active) = {
                    let mut state = self.state.lock().await;
                    if let Some(value) = temperature {
                        state.temperature = value;
                    }
                    if let Some(value) = humidity {
                        state.humidity = value;
                    }
                    (state.reading(), state.relays.clone(), state.fuzzy_active)
                };
                Some(self.run_cycle(reading, &relays, fuzzy_active).await)
            }
            Inbound::Config { setpoint } => {
                if let Some(value) = setpoint {
                    self.state.lock().await.setpoint = value;
                    tracing::info!(setpoint = value, "setpoint updated");
                }
                None
            }
            Inbound::RelayStatus(update) => {
                self.state.lock().await.relays.merge(update);
                None
            }
            Inbound::FuzzyControl { active } => {
                self.state.lock().await.fuzzy_active = active;
                tracing::info!(active, "fuzzy control toggled");
                None
            }
        }
    }

    /// Most recent recorded decisions, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the history port.
    pub async fn recent_decisions(
        &self,
        limit: usize,
    ) -> Result<Vec<DecisionRecord>, ClimateError> {
        self.history.get_recent(limit).await
    }

    async fn run_cycle(
        &self,
        reading: Reading,
        relays: &RelayStatuses,
        fuzzy_active: bool,
    ) -> Decision {
        if let Err(err) = reading.validate() {
            tracing::warn!(error = %err, "reading outside its domain, inputs will be clamped");
        }
        let decision = self.on_reading(reading, relays);
        tracing::info!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            setpoint = reading.setpoint,
            alerts = decision.rules.alerts.len(),
            actions = decision.rules.actions.len(),
            fan = decision.fuzzy.fan,
            heater = decision.fuzzy.heater,
            humidifier = decision.fuzzy.humidifier,
            status = %decision.fuzzy.status,
            "decision cycle finished"
        );

        self.publish(Outbound::Analysis(decision.analysis())).await;
        if !decision.rules.alerts.is_empty() {
            let alerts = decision.rules.alerts.clone();
            self.publish(Outbound::Alerts(alerts)).await;
        }

        if fuzzy_active {
            for (relay, command) in decision.commands.iter() {
                self.publish(Outbound::RelayCommand { relay, command }).await;
            }
            self.publish(Outbound::FuzzyState(decision.fuzzy_state())).await;
            if let Err(err) = self.history.record(DecisionRecord::from(&decision)).await {
                tracing::warn!(error = %err, "failed to record decision");
            }
        } else {
            tracing::debug!("fuzzy control disabled, skipping relay commands");
        }
        decision
    }

    async fn publish(&self, message: Outbound) {
        let kind = message.kind();
        if let Err(err) = self.publisher.publish(message).await {
            tracing::warn!(error = %err, kind, "failed to publish message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use clima_domain::action::ActionKind;
    use clima_domain::alert::{AlertKind, Severity};
    use clima_domain::command::Command;
    use clima_domain::decision::FuzzyStatus;
    use clima_domain::relay::{Actuator, RelayState};
    use clima_domain::rule::SystemState;

    #[derive(Default)]
    struct SpyPublisher {
        sent: Mutex<Vec<Outbound>>,
        fail: bool,
    }

    impl SpyPublisher {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn kinds(&self) -> Vec<&'static str> {
            self.sent.lock().unwrap().iter().map(Outbound::kind).collect()
        }
    }

    impl DecisionPublisher for SpyPublisher {
        fn publish(
            &self,
            message: Outbound,
        ) -> impl Future<Output = Result<(), ClimateError>> + Send {
            let result = if self.fail {
                Err(ClimateError::Transport("broker unreachable".into()))
            } else {
                self.sent.lock().unwrap().push(message);
                Ok(())
            };
            async { result }
        }
    }

    #[derive(Default)]
    struct SpyHistory {
        records: Mutex<Vec<DecisionRecord>>,
    }

    impl DecisionHistory for SpyHistory {
        fn record(
            &self,
            record: DecisionRecord,
        ) -> impl Future<Output = Result<DecisionRecord, ClimateError>> + Send {
            self.records.lock().unwrap().push(record.clone());
            async { Ok(record) }
        }

        fn get_recent(
            &self,
            limit: usize,
        ) -> impl Future<Output = Result<Vec<DecisionRecord>, ClimateError>> + Send {
            let result: Vec<DecisionRecord> = self
                .records
                .lock()
                .unwrap()
                .iter()
                .rev()
                .take(limit)
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    type Service = DecisionService<Arc<SpyPublisher>, Arc<SpyHistory>>;

    fn make_service() -> (Service, Arc<SpyPublisher>, Arc<SpyHistory>) {
        let publisher = Arc::new(SpyPublisher::default());
        let history = Arc::new(SpyHistory::default());
        let fuzzy = Arc::new(FuzzyEngine::new().unwrap());
        let service = DecisionService::new(fuzzy, Arc::clone(&publisher), Arc::clone(&history));
        (service, publisher, history)
    }

    fn sensors(temperature: f64, humidity: f64) -> Inbound {
        Inbound::Sensors {
            temperature: Some(temperature),
            humidity: Some(humidity),
        }
    }

    #[tokio::test]
    async fn should_publish_full_cycle_in_order() {
        let (service, publisher, history) = make_service();

        let decision = service.handle(sensors(42.0, 60.0)).await.unwrap();

        assert_eq!(decision.rules.highest_severity(), Some(Severity::Critical));
        assert_eq!(decision.commands.fan, Command::On);
        assert_eq!(decision.commands.heater, Command::Off);
        assert_eq!(
            publisher.kinds(),
            vec![
                "analysis",
                "alerts",
                "relay_command",
                "relay_command",
                "relay_command",
                "fuzzy_state",
            ]
        );
        assert_eq!(history.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_skip_alerts_topic_without_alerts() {
        let (service, publisher, _history) = make_service();

        let decision = service.handle(sensors(23.0, 50.0)).await.unwrap();

        assert!(decision.rules.has_state(SystemState::ComfortOptimal));
        assert!(!publisher.kinds().contains(&"alerts"));
    }

    #[tokio::test]
    async fn should_only_publish_analysis_when_fuzzy_control_disabled() {
        let (service, publisher, history) = make_service();
        service.handle(Inbound::FuzzyControl { active: false }).await;

        service.handle(sensors(25.0, 90.0)).await.unwrap();

        assert_eq!(publisher.kinds(), vec!["analysis", "alerts"]);
        assert!(history.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_start_with_fuzzy_control_disabled_when_configured() {
        let (service, publisher, _history) = make_service();
        let service = service.with_fuzzy_active(false).with_setpoint(26.0);

        service.handle(sensors(25.0, 50.0)).await.unwrap();

        assert!(!service.state().await.fuzzy_active);
        assert_eq!(service.state().await.setpoint, 26.0);
        assert_eq!(publisher.kinds(), vec!["analysis"]);
    }

    #[tokio::test]
    async fn should_keep_previous_values_for_missing_fields() {
        let (service, _publisher, _history) = make_service();
        service.handle(sensors(30.0, 70.0)).await;
        service
            .handle(Inbound::Config {
                setpoint: Some(22.0),
            })
            .await;

        let decision = service
            .handle(Inbound::Sensors {
                temperature: None,
                humidity: Some(40.0),
            })
            .await
            .unwrap();

        assert!((decision.reading.temperature - 30.0).abs() < f64::EPSILON);
        assert!((decision.reading.humidity - 40.0).abs() < f64::EPSILON);
        assert!((decision.reading.setpoint - 22.0).abs() < f64::EPSILON);
        assert!((decision.fuzzy.diff - 8.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_use_defaults_before_first_sample() {
        let (service, _publisher, _history) = make_service();
        let state = service.state().await;
        assert_eq!(state, ControllerState::default());
        assert!(state.fuzzy_active);
        assert!((state.reading().diff()).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_raise_conflict_from_reported_relay_status() {
        let (service, _publisher, _history) = make_service();
        let relays = RelayStatuses::new()
            .with(Actuator::Fan.relay(), RelayState::new(true, 100))
            .with(Actuator::Heater.relay(), RelayState::new(true, 100));
        assert!(service.handle(Inbound::RelayStatus(relays)).await.is_none());

        let decision = service.handle(sensors(28.0, 50.0)).await.unwrap();

        assert!(decision.rules.has_alert(AlertKind::ActuatorConflict));
        assert!(decision.rules.has_action(ActionKind::HeaterOff));
        assert!(decision.rules.has_action(ActionKind::KeepFan));
    }

    #[tokio::test]
    async fn should_keep_cycle_running_when_publisher_fails() {
        let publisher = Arc::new(SpyPublisher::failing());
        let history = Arc::new(SpyHistory::default());
        let service = DecisionService::new(
            Arc::new(FuzzyEngine::new().unwrap()),
            Arc::clone(&publisher),
            Arc::clone(&history),
        );

        let decision = service.handle(sensors(32.0, 60.0)).await.unwrap();

        assert_eq!(decision.fuzzy.status, FuzzyStatus::Ok);
        assert_eq!(history.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_apply_custom_threshold() {
        let (service, _publisher, _history) = make_service();
        let service = service.with_threshold(99.0);
        let decision = service.handle(sensors(42.0, 60.0)).await.unwrap();
        assert_eq!(decision.commands.fan, Command::Off);
    }

    #[tokio::test]
    async fn should_return_recent_decisions_newest_first() {
        let (service, _publisher, _history) = make_service();
        service.handle(sensors(20.0, 50.0)).await;
        service.handle(sensors(30.0, 50.0)).await;

        let recent = service.recent_decisions(10).await.unwrap();

        assert_eq!(recent.len(), 2);
        assert!((recent[0].temperature - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_evaluate_both_engines_on_same_reading() {
        let (service, _publisher, _history) = make_service();
        let decision = service.on_reading(Reading::new(32.0, 60.0, 24.0), &RelayStatuses::new());
        assert!(decision.fuzzy.fan > 75.0);
        assert!(decision.fuzzy.heater < 10.0);
        assert!(decision.rules.alerts.is_empty());
        assert!(decision.analysis().fired_rules == decision.rules.fired.len());
    }
}
