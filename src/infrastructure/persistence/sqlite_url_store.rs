//! SQLite implementation of the URL store.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::domain::context::RequestContext;
use crate::domain::entities::ShortenedUrl;
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlStore;

/// SQLite-backed store for shortened URLs.
///
/// All statements are parameterized; a duplicate short id is rejected by the
/// primary key and surfaces as [`StoreError::Conflict`].
pub struct SqliteUrlStore {
    pool: Arc<SqlitePool>,
}

impl SqliteUrlStore {
    /// Creates a new store over an existing, migrated pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Opens the database named by `config.database_url`, creating the file
    /// if it is missing, and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the URL is malformed, the database
    /// cannot be opened, or a migration fails.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;

        Ok(Self::new(Arc::new(pool)))
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool.as_ref()
    }
}

#[async_trait]
impl UrlStore for SqliteUrlStore {
    async fn add(&self, ctx: &RequestContext, short: &str, long: &str) -> Result<(), StoreError> {
        ctx.check()?;

        sqlx::query("INSERT INTO url (short, long, count) VALUES (?, ?, 0)")
            .bind(short)
            .bind(long)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_insert_error(e, short))?;

        Ok(())
    }

    async fn get(&self, ctx: &RequestContext, short: &str) -> Result<String, StoreError> {
        ctx.check()?;

        let row = sqlx::query_as::<_, ShortenedUrl>(
            "SELECT short, long, count FROM url WHERE short = ?",
        )
        .bind(short)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|r| r.long).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, ctx: &RequestContext, short: &str) -> Result<(), StoreError> {
        ctx.check()?;

        let result = sqlx::query("DELETE FROM url WHERE short = ?")
            .bind(short)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn increment_count(&self, ctx: &RequestContext, short: &str) -> Result<(), StoreError> {
        ctx.check()?;

        let result = sqlx::query("UPDATE url SET count = count + 1 WHERE short = ?")
            .bind(short)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn get_count(&self, ctx: &RequestContext, short: &str) -> Result<i64, StoreError> {
        ctx.check()?;

        sqlx::query_scalar::<_, i64>("SELECT count FROM url WHERE short = ?")
            .bind(short)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self, ctx: &RequestContext) -> Result<(), StoreError> {
        ctx.check()?;

        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;

        Ok(())
    }
}

/// Classifies a failed insert, turning a primary key violation into
/// [`StoreError::Conflict`].
fn map_insert_error(e: sqlx::Error, short: &str) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::Conflict(short.to_string());
    }

    StoreError::Database(e)
}
