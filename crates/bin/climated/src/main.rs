//! # climated: clima daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (`clima.toml`, env vars, `--demo` flag)
//! - Initialise `tracing` with the configured filter
//! - Initialise the `SQLite` connection pool and run migrations
//! - Build the fuzzy knowledge base and the decision service
//! - Connect the MQTT bridge and serve the HTTP status endpoints
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer, no domain logic belongs here.

mod config;
mod demo;

use std::future::IntoFuture;
use std::sync::Arc;

use clima_adapter_http_axum::router;
use clima_adapter_http_axum::state::AppState;
use clima_adapter_mqtt::MqttBridge;
use clima_adapter_storage_sqlite_sqlx::{Config as DbConfig, SqliteDecisionHistory};
use clima_app::decision_service::DecisionService;
use clima_app::fuzzy_engine::FuzzyEngine;
use clima_app::rule_engine::RuleEngine;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if std::env::args().skip(1).any(|arg| arg == "--demo") {
        tracing::info!("starting in offline demo mode");
        return demo::run(&config.control).await;
    }

    // Database
    let db = DbConfig::new(config.database_url())
        .with_max_connections(config.database.max_connections)
        .build()
        .await?;
    let history = Arc::new(SqliteDecisionHistory::new(db.pool().clone()));

    // Decision core
    let fuzzy = Arc::new(FuzzyEngine::new()?);
    tracing::info!(
        rules = fuzzy.system().rule_count(),
        threshold = config.control.threshold,
        "fuzzy knowledge base ready"
    );

    // Transport
    let bridge = MqttBridge::new(&config.mqtt);
    let service = Arc::new(
        DecisionService::new(fuzzy, bridge.publisher(), Arc::clone(&history))
            .with_rule_engine(RuleEngine::new(config.control.cascade_limit))
            .with_threshold(config.control.threshold)
            .with_setpoint(config.control.setpoint)
            .with_fuzzy_active(config.control.fuzzy_active),
    );

    // HTTP
    let app = router::build(AppState::from_arc(history));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        broker = %config.mqtt.broker_host,
        port = config.mqtt.broker_port,
        "climated listening"
    );

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    tokio::select! {
        result = server => result?,
        () = bridge.run(service) => {}
    }

    tracing::info!("climated stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
