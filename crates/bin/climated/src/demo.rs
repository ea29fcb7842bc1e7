//! Offline demo mode: scripted scenarios fed through the real service.
//!
//! Messages that would go to the broker are written to the log instead, and
//! decisions are recorded in an in-memory database.

use std::sync::Arc;

use clima_adapter_storage_sqlite_sqlx::{Config as DbConfig, SqliteDecisionHistory};
use clima_app::decision_service::DecisionService;
use clima_app::fuzzy_engine::FuzzyEngine;
use clima_app::ports::DecisionPublisher;
use clima_app::rule_engine::RuleEngine;
use clima_domain::error::ClimateError;
use clima_domain::message::{Inbound, Outbound};
use clima_domain::relay::{Actuator, RelayState, RelayStatuses};

use crate::config::ControlConfig;

/// Publisher that logs every outbound message as JSON.
pub struct LogPublisher;

impl DecisionPublisher for LogPublisher {
    async fn publish(&self, message: Outbound) -> Result<(), ClimateError> {
        let kind = message.kind();
        let body = match &message {
            Outbound::Analysis(analysis) => serde_json::to_string(analysis),
            Outbound::Alerts(alerts) => serde_json::to_string(alerts),
            Outbound::RelayCommand { relay, command } => Ok(format!("{relay} {command}")),
            Outbound::FuzzyState(state) => serde_json::to_string(state),
        }
        .map_err(|err| ClimateError::Transport(Box::new(err)))?;
        tracing::info!(kind, %body, "outbound");
        Ok(())
    }
}

struct Scenario {
    name: &'static str,
    temperature: f64,
    humidity: f64,
    fan_on: bool,
    heater_on: bool,
}

const SCENARIOS: [Scenario; 7] = [
    Scenario {
        name: "extreme heat",
        temperature: 42.0,
        humidity: 60.0,
        fan_on: false,
        heater_on: false,
    },
    Scenario {
        name: "critical humidity",
        temperature: 25.0,
        humidity: 90.0,
        fan_on: false,
        heater_on: false,
    },
    Scenario {
        name: "comfort",
        temperature: 23.0,
        humidity: 50.0,
        fan_on: false,
        heater_on: false,
    },
    Scenario {
        name: "very cold",
        temperature: 8.0,
        humidity: 40.0,
        fan_on: false,
        heater_on: false,
    },
    Scenario {
        name: "hot and humid",
        temperature: 30.0,
        humidity: 80.0,
        fan_on: true,
        heater_on: false,
    },
    Scenario {
        name: "cold and dry",
        temperature: 18.0,
        humidity: 25.0,
        fan_on: false,
        heater_on: true,
    },
    Scenario {
        name: "fan and heater fighting",
        temperature: 28.0,
        humidity: 55.0,
        fan_on: true,
        heater_on: true,
    },
];

/// Run every scenario once and log the resulting decisions.
///
/// # Errors
///
/// Returns an error if the in-memory database or the fuzzy knowledge base
/// cannot be initialised.
pub async fn run(control: &ControlConfig) -> anyhow::Result<()> {
    let db = DbConfig::in_memory().build().await?;
    let history = SqliteDecisionHistory::new(db.pool().clone());
    let fuzzy = Arc::new(FuzzyEngine::new()?);

    let service = DecisionService::new(fuzzy, LogPublisher, history)
        .with_rule_engine(RuleEngine::new(control.cascade_limit))
        .with_threshold(control.threshold)
        .with_setpoint(control.setpoint);

    for scenario in &SCENARIOS {
        tracing::info!(scenario = scenario.name, "running scenario");
        let relays = RelayStatuses::new()
            .with(
                Actuator::Fan.relay(),
                RelayState::new(scenario.fan_on, 0),
            )
            .with(
                Actuator::Heater.relay(),
                RelayState::new(scenario.heater_on, 0),
            );
        service.handle(Inbound::RelayStatus(relays)).await;
        let decision = service
            .handle(Inbound::Sensors {
                temperature: Some(scenario.temperature),
                humidity: Some(scenario.humidity),
            })
            .await;
        if let Some(decision) = decision {
            tracing::info!(
                scenario = scenario.name,
                alerts = decision.rules.alerts.len(),
                actions = decision.rules.actions.len(),
                fan = %decision.commands.fan,
                heater = %decision.commands.heater,
                humidifier = %decision.commands.humidifier,
                "scenario decided"
            );
        }
    }

    let recorded = service.recent_decisions(SCENARIOS.len()).await?;
    tracing::info!(recorded = recorded.len(), "demo finished");
    Ok(())
}
