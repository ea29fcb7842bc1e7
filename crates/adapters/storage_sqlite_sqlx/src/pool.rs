//! Connection pool setup and embedded migrations.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

/// Connections opened when no size is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the decision history lives and how many connections serve it.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:clima.db` or `sqlite::memory:`).
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Private in-memory database, dropped with the last connection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    /// Open the pool, creating the database file if missing, and apply
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is malformed, the connection
    /// fails or a migration fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await?;
        tracing::debug!(
            database_url = %self.database_url,
            max_connections = self.max_connections,
            "applying migrations"
        );
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Database { pool })
    }
}

/// An open, migrated database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_migrate_in_memory_database() {
        let db = Config::in_memory().build().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, vec!["fuzzy_decisions"]);
    }

    #[tokio::test]
    async fn should_size_pool_from_config() {
        let db = Config::in_memory()
            .with_max_connections(2)
            .build()
            .await
            .unwrap();
        assert_eq!(db.pool().options().get_max_connections(), 2);
    }

    #[test]
    fn should_keep_at_least_one_connection() {
        let config = Config::new("sqlite:clima.db").with_max_connections(0);
        assert_eq!(config.max_connections, 1);
        assert_eq!(Config::new("sqlite:clima.db").max_connections, DEFAULT_MAX_CONNECTIONS);
    }
}
