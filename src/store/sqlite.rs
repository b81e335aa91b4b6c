// Embedded SQLite user store
//
// The server keeps its users in a single SQLite file under the crew data
// directory. The `name` column carries a UNIQUE constraint, so a duplicate
// registration is rejected by the insert itself rather than a prior lookup.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use super::{StoreError, UserStore};
use crate::core::models::User;

/// Database row structure for user lookup
#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
        }
    }
}

/// SQLite-backed user store
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Open (or create) the database file at `path` and run migrations
    pub async fn connect(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Failure(format!(
                        "Could not create data directory {:?}: {}",
                        parent, e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Failure(format!("Failed to open database: {}", e)))?;

        info!(path = ?path, "Connected to SQLite database");

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Create from an existing pool
    ///
    /// The caller is responsible for calling [`SqliteUserStore::migrate`].
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `users` table if it does not exist
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Schema migration failed");
            StoreError::Failure(e.to_string())
        })?;

        Ok(())
    }
}

/// Classify a sqlx error, separating unique violations from everything else
fn map_insert_error(err: sqlx::Error, name: &str) -> StoreError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateName(name.to_string())
        }
        other => StoreError::Failure(other.to_string()),
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create_user(&self, name: &str) -> Result<User, StoreError> {
        let result = sqlx::query("INSERT INTO users (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, name))?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    async fn find_user(&self, name: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, name FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Failure(e.to_string()))?;

        Ok(row.map(User::from))
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Failure(e.to_string()))?;

        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Failure(format!("SQLite ping failed: {}", e)))
    }
}
