//! `SQLite` implementation of [`DecisionHistory`].

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use clima_app::ports::DecisionHistory;
use clima_domain::command::Command;
use clima_domain::decision::FuzzyStatus;
use clima_domain::decision_history::{DecisionId, DecisionRecord};
use clima_domain::error::ClimateError;
use clima_domain::time::{Timestamp, parse_rfc3339};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(DecisionRecord);

fn decode_command(row: &SqliteRow, column: &str) -> Result<Command, sqlx::Error> {
    let text: String = row.try_get(column)?;
    serde_json::from_str(&format!("\"{text}\"")).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let recorded_at_str: String = row.try_get("recorded_at")?;
        let status_str: String = row.try_get("estado")?;

        let recorded_at =
            parse_rfc3339(&recorded_at_str).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let status: FuzzyStatus = status_str
            .parse()
            .map_err(|err: String| sqlx::Error::Decode(err.into()))?;

        Ok(Self(DecisionRecord {
            id: DecisionId::from_uuid(id),
            recorded_at,
            temperature: row.try_get("temperatura_actual")?,
            humidity: row.try_get("humedad_actual")?,
            setpoint: row.try_get("setpoint")?,
            diff: row.try_get("diferencia_temp")?,
            fan_power: row.try_get("potencia_ventilador")?,
            heater_power: row.try_get("potencia_calefactor")?,
            humidifier_power: row.try_get("potencia_humidificador")?,
            fan_command: decode_command(row, "comando_ventilador")?,
            heater_command: decode_command(row, "comando_calefactor")?,
            humidifier_command: decode_command(row, "comando_humidificador")?,
            status,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO fuzzy_decisions (
        id, recorded_at,
        temperatura_actual, humedad_actual, setpoint, diferencia_temp,
        potencia_ventilador, potencia_calefactor, potencia_humidificador,
        comando_ventilador, comando_calefactor, comando_humidificador,
        estado
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_RECENT: &str = r"
    SELECT * FROM fuzzy_decisions
    ORDER BY recorded_at DESC, rowid DESC
    LIMIT ?
";

/// Fixed-width UTC timestamps keep lexical and chronological order aligned.
fn encode_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `SQLite`-backed decision history.
#[derive(Clone)]
pub struct SqliteDecisionHistory {
    pool: SqlitePool,
}

impl SqliteDecisionHistory {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DecisionHistory for SqliteDecisionHistory {
    async fn record(&self, record: DecisionRecord) -> Result<DecisionRecord, ClimateError> {
        sqlx::query(INSERT)
            .bind(record.id.as_uuid())
            .bind(encode_timestamp(record.recorded_at))
            .bind(record.temperature)
            .bind(record.humidity)
            .bind(record.setpoint)
            .bind(record.diff)
            .bind(record.fan_power)
            .bind(record.heater_power)
            .bind(record.humidifier_power)
            .bind(record.fan_command.as_str())
            .bind(record.heater_command.as_str())
            .bind(record.humidifier_command.as_str())
            .bind(record.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(record)
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<DecisionRecord>, ClimateError> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(limit_i64)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
