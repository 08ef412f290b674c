//! Item storage - one trait, several backends
//!
//! Every backend:
//! - Orders items by ascending `created_at`, ties broken by id
//! - Applies the optional `before` boundary inclusively
//! - Returns an empty page (not an error) past the end
//! - Treats removal of an unknown id as success
//! - Rejects a second insert of the same id
//! - Keeps each insert/remove atomic (index and value never observably split)

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::Item;

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
pub mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;
pub use sqlite::SqliteStore;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("item encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("item '{id}' already exists")]
    Duplicate { id: String },

    #[error("corrupt record for item '{id}': {reason}")]
    Corrupt { id: String, reason: &'static str },
}

/// The slice of the creation order a single page covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u32,
    pub before: Option<DateTime<Utc>>,
}

/// Storage contract shared by every backend
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new item. An id that is already stored is rejected with
    /// [`StoreError::Duplicate`] and the stored item is left untouched.
    async fn insert(&self, item: &Item) -> Result<(), StoreError>;

    /// Delete an item. Unknown ids are not an error.
    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// Fetch at most `window.limit` items starting `window.offset` positions
    /// into the creation order.
    async fn range(&self, window: Window) -> Result<Vec<Item>, StoreError>;

    /// Fetch a single item by id.
    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Round trip to the backend without touching any item.
    async fn ping(&self) -> Result<(), StoreError> {
        self.range(Window {
            offset: 0,
            limit: 1,
            before: None,
        })
        .await
        .map(|_| ())
    }

    /// Release backend resources.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Which backend to open at process start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite { url: String },
    #[cfg(feature = "redis")]
    Redis { url: String },
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Sqlite { url } => write!(f, "sqlite ({})", url),
            #[cfg(feature = "redis")]
            Self::Redis { url } => write!(f, "redis ({})", url),
        }
    }
}

/// Open the configured backend.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn ItemStore>, StoreError> {
    tracing::info!(store = %config, "Opening item store");

    let store: Arc<dyn ItemStore> = match config {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Sqlite { url } => Arc::new(SqliteStore::open(url).await?),
        #[cfg(feature = "redis")]
        StoreConfig::Redis { url } => Arc::new(RedisStore::open(url).await?),
    };

    Ok(store)
}
