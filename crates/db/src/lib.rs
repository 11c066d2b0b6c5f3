//! SQLite connection pool and forward-only migration runner for shelf.

use anyhow::Context;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// A forward-only SQL migration contributed by a module.
///
/// Each migration runs at most once per database; applied ids are recorded
/// in the `_migrations` ledger table, scoped by module name.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

const LEDGER_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    );
"#;

/// Handle on the storage layer, opened once at process start.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool against the given SQLite URL (e.g. `sqlite://shelf.db?mode=rwc`
    /// or `sqlite::memory:`).
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .with_context(|| format!("failed to open database at '{url}'"))?;

        tracing::info!(target: "shelf-db", url, max_connections, "database pool opened");
        Ok(Self { pool })
    }

    /// Borrow the underlying pool for query execution.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply a module's migrations in order, skipping ids already recorded
    /// in the ledger. Safe to call on every startup.
    pub async fn apply_migrations(
        &self,
        module: &str,
        migrations: &[Migration],
    ) -> anyhow::Result<()> {
        sqlx::raw_sql(LEDGER_SQL)
            .execute(&self.pool)
            .await
            .context("failed to create migration ledger")?;

        for migration in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT id FROM _migrations WHERE module = ?1 AND id = ?2")
                    .bind(module)
                    .bind(migration.id)
                    .fetch_optional(&self.pool)
                    .await
                    .context("failed to read migration ledger")?;

            if applied.is_some() {
                tracing::debug!(target: "shelf-db", module, id = migration.id, "migration already applied");
                continue;
            }

            sqlx::raw_sql(migration.up)
                .execute(&self.pool)
                .await
                .with_context(|| {
                    format!("failed to apply migration '{}' for module '{module}'", migration.id)
                })?;

            sqlx::query("INSERT INTO _migrations (module, id) VALUES (?1, ?2)")
                .bind(module)
                .bind(migration.id)
                .execute(&self.pool)
                .await
                .context("failed to record migration")?;

            tracing::info!(target: "shelf-db", module, id = migration.id, "migration applied");
        }

        Ok(())
    }

    /// Close the pool, waiting for in-flight connections to finish.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(target: "shelf-db", "database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MIGRATION: Migration = Migration {
        id: "001_widgets",
        up: "CREATE TABLE widgets (id TEXT PRIMARY KEY, label TEXT NOT NULL);",
    };

    #[tokio::test]
    async fn applies_migration_once() {
        let db = Database::connect("sqlite::memory:", 1).await.unwrap();

        db.apply_migrations("widgets", &[TEST_MIGRATION]).await.unwrap();
        // A second pass must skip the already-applied id instead of failing
        // on the duplicate CREATE TABLE.
        db.apply_migrations("widgets", &[TEST_MIGRATION]).await.unwrap();

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM _migrations WHERE module = 'widgets'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn migrated_table_is_usable() {
        let db = Database::connect("sqlite::memory:", 1).await.unwrap();
        db.apply_migrations("widgets", &[TEST_MIGRATION]).await.unwrap();

        sqlx::query("INSERT INTO widgets (id, label) VALUES ('w1', 'first')")
            .execute(db.pool())
            .await
            .unwrap();

        let (label,): (String,) = sqlx::query_as("SELECT label FROM widgets WHERE id = 'w1'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(label, "first");
    }
}
