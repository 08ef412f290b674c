//! SQLite item store
//!
//! One `items` table with an index on the creation timestamp. Pages are
//! served with `ORDER BY created_at, id LIMIT ? OFFSET ?`.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;

use super::{ItemStore, StoreError, Window};
use crate::models::Item;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const INSERT_ITEM: &str =
    "INSERT INTO items (id, title, content, created_at) VALUES (?, ?, ?, ?)";

const REMOVE_ITEM: &str = "DELETE FROM items WHERE id = ?";

const SELECT_ITEM: &str = "SELECT id, title, content, created_at FROM items WHERE id = ?";

const SELECT_RANGE: &str = r#"
    SELECT id, title, content, created_at
    FROM items
    WHERE created_at <= ?
    ORDER BY created_at ASC, id ASC
    LIMIT ? OFFSET ?
"#;

/// SQLite-backed item storage
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = SqliteStore::open("sqlite://tinytodo.db").await?;
    /// ```
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        if url.contains(":memory:") {
            return Self::open_in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Open a private in-memory database.
    ///
    /// Every pooled connection to `:memory:` would get its own database, so
    /// the pool is pinned to one connection that never expires.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::raw_sql(include_str!("schema.sql"))
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }
}

fn item_from_row(row: &SqliteRow) -> Result<Item, StoreError> {
    let id: String = row.try_get("id")?;
    let micros: i64 = row.try_get("created_at")?;

    let created_at =
        DateTime::<Utc>::from_timestamp_micros(micros).ok_or_else(|| StoreError::Corrupt {
            id: id.clone(),
            reason: "created_at out of range",
        })?;

    Ok(Item {
        id,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created_at,
    })
}

#[async_trait]
impl ItemStore for SqliteStore {
    async fn insert(&self, item: &Item) -> Result<(), StoreError> {
        let result = sqlx::query(INSERT_ITEM)
            .bind(&item.id)
            .bind(&item.title)
            .bind(item.content.as_deref())
            .bind(item.created_at.timestamp_micros())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate {
                    id: item.id.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query(REMOVE_ITEM).bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn range(&self, window: Window) -> Result<Vec<Item>, StoreError> {
        let before = window
            .before
            .map(|b| b.timestamp_micros())
            .unwrap_or(i64::MAX);

        let rows = sqlx::query(SELECT_RANGE)
            .bind(before)
            .bind(i64::from(window.limit))
            .bind(i64::try_from(window.offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(item_from_row).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let row = sqlx::query(SELECT_ITEM)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(item_from_row).transpose()
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.pool.close().await;
        Ok(())
    }
}
