//! SQLite connection pooling and migration bookkeeping for biblio.
//!
//! Modules contribute [`Migration`] scripts; [`Database::apply_migrations`]
//! runs each script once and records it in `_biblio_migrations` so repeated
//! boots are idempotent.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// A SQL script contributed by a module, applied once at startup.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Connection-pool configuration for the SQLite backend.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLx connection URL, e.g. `sqlite:biblio.db` or `sqlite::memory:`.
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// In-memory database for tests. Pinned to a single connection: every
    /// `sqlite::memory:` connection is its own database, so a wider pool
    /// would scatter tables across connections.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Cloneable handle over the shared SQLite pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the pool described by `config`, creating the database file if
    /// it does not exist yet.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let mut options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("invalid database url '{}'", config.url))?
            .create_if_missing(true)
            .foreign_keys(true);

        // In-memory databases only support the "memory" journal mode.
        if !config.url.contains(":memory:") {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to '{}'", config.url))?;

        tracing::info!(url = %config.url, "database pool ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply module migrations that have not run yet, in the order given.
    /// Each entry pairs the owning module's name with the script.
    pub async fn apply_migrations(
        &self,
        migrations: &[(String, Migration)],
    ) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _biblio_migrations (
                module TEXT NOT NULL,
                id TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (module, id)
            )",
        )
        .execute(&self.pool)
        .await
        .context("failed to create migration bookkeeping table")?;

        for (module, migration) in migrations {
            let applied: Option<(String,)> = sqlx::query_as(
                "SELECT id FROM _biblio_migrations WHERE module = ? AND id = ?",
            )
            .bind(module)
            .bind(migration.id)
            .fetch_optional(&self.pool)
            .await
            .context("failed to query applied migrations")?;

            if applied.is_some() {
                continue;
            }

            tracing::info!(module = %module, id = migration.id, "applying migration");

            // Scripts may hold several statements.
            sqlx::raw_sql(migration.up)
                .execute(&self.pool)
                .await
                .with_context(|| {
                    format!("migration '{}/{}' failed", module, migration.id)
                })?;

            sqlx::query("INSERT INTO _biblio_migrations (module, id) VALUES (?, ?)")
                .bind(module)
                .bind(migration.id)
                .execute(&self.pool)
                .await
                .context("failed to record applied migration")?;
        }

        Ok(())
    }
}
