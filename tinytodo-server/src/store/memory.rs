//! In-memory item store
//!
//! An owned, lock-guarded ordered map. Nothing is persisted; intended for
//! tests and throwaway instances.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{ItemStore, StoreError, Window};
use crate::models::Item;

type OrderKey = (DateTime<Utc>, String);

#[derive(Default)]
struct Inner {
    /// Items in creation order
    ordered: BTreeMap<OrderKey, Item>,
    /// id -> creation time, for removal
    index: HashMap<String, DateTime<Utc>>,
}

/// Item store backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.ordered.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn insert(&self, item: &Item) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if inner.index.contains_key(&item.id) {
            return Err(StoreError::Duplicate {
                id: item.id.clone(),
            });
        }

        inner.index.insert(item.id.clone(), item.created_at);
        inner
            .ordered
            .insert((item.created_at, item.id.clone()), item.clone());

        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(created_at) = inner.index.remove(id) {
            inner.ordered.remove(&(created_at, id.to_owned()));
        }

        Ok(())
    }

    async fn range(&self, window: Window) -> Result<Vec<Item>, StoreError> {
        let inner = self.inner.read().await;
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);

        let items = inner
            .ordered
            .values()
            .take_while(|item| window.before.map_or(true, |before| item.created_at <= before))
            .skip(offset)
            .take(window.limit as usize)
            .cloned()
            .collect();

        Ok(items)
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let inner = self.inner.read().await;

        Ok(inner
            .index
            .get(id)
            .and_then(|created_at| inner.ordered.get(&(*created_at, id.to_owned())))
            .cloned())
    }
}
