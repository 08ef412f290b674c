//! Redis item store
//!
//! Layout:
//! - `todos:items:all` sorted set, member = item id, score = creation time in
//!   unix microseconds
//! - `todos:item:{id}` string holding the item as JSON
//!
//! Both keys are written (or deleted) in one `MULTI`/`EXEC` pipeline so a
//! reader never sees an index entry without its value. Inserts use `NX` on
//! both keys, so an existing id keeps its value and score.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{ItemStore, StoreError, Window};
use crate::models::Item;

const INDEX_KEY: &str = "todos:items:all";

fn item_key(id: &str) -> String {
    format!("todos:item:{}", id)
}

/// Redis-backed item storage
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to `url` and verify the server answers.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let store = Self {
            conn: ConnectionManager::new(client).await?,
        };

        store.ping().await?;
        Ok(store)
    }
}

#[async_trait]
impl ItemStore for RedisStore {
    async fn insert(&self, item: &Item) -> Result<(), StoreError> {
        let payload = serde_json::to_string(item)?;
        let score = item.created_at.timestamp_micros();
        let mut conn = self.conn.clone();

        let (written, _added): (Option<String>, i64) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(item_key(&item.id))
            .arg(payload)
            .arg("NX")
            .cmd("ZADD")
            .arg(INDEX_KEY)
            .arg("NX")
            .arg(score)
            .arg(&item.id)
            .query_async(&mut conn)
            .await?;

        // SET NX answers nil when the key already exists
        if written.is_none() {
            return Err(StoreError::Duplicate {
                id: item.id.clone(),
            });
        }

        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        let _: () = redis::pipe()
            .atomic()
            .zrem(INDEX_KEY, id)
            .ignore()
            .del(item_key(id))
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn range(&self, window: Window) -> Result<Vec<Item>, StoreError> {
        let mut conn = self.conn.clone();
        let max = window
            .before
            .map(|b| b.timestamp_micros().to_string())
            .unwrap_or_else(|| "+inf".to_owned());
        let offset = isize::try_from(window.offset).unwrap_or(isize::MAX);
        let count = isize::try_from(window.limit).unwrap_or(isize::MAX);

        let ids: Vec<String> = conn
            .zrangebyscore_limit(INDEX_KEY, "-inf", max, offset, count)
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| item_key(id)).collect();
        let payloads: Vec<Option<String>> = conn.mget(&keys).await?;

        ids.into_iter()
            .zip(payloads)
            .map(|(id, payload)| match payload {
                Some(json) => Ok(serde_json::from_str(&json)?),
                None => Err(StoreError::Corrupt {
                    id,
                    reason: "index entry without value",
                }),
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(item_key(id)).await?;

        Ok(payload
            .map(|json| serde_json::from_str(&json))
            .transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    // Integration tests - run with a local redis
    // REDIS_URL=redis://127.0.0.1:6379 cargo test -p tinytodo-server -- --ignored

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
    }

    #[test]
    fn item_key_layout() {
        assert_eq!(item_key("abc"), "todos:item:abc");
    }

    #[tokio::test]
    #[ignore = "requires redis"]
    async fn insert_range_remove() {
        let store = RedisStore::open(&redis_url()).await.expect("redis connection failed");
        let item = Item {
            id: uuid::Uuid::new_v4().to_string(),
            title: "redis item".into(),
            content: Some("body".into()),
            created_at: DateTime::from_timestamp_micros(1).unwrap(),
        };

        store.insert(&item).await.unwrap();
        assert_eq!(store.get(&item.id).await.unwrap(), Some(item.clone()));

        let page = store
            .range(Window {
                offset: 0,
                limit: 1,
                before: Some(item.created_at),
            })
            .await
            .unwrap();
        assert_eq!(page.first().map(|i| i.id.as_str()), Some(item.id.as_str()));

        let err = store.insert(&item).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        store.remove(&item.id).await.unwrap();
        store.remove(&item.id).await.unwrap();
        assert!(store.get(&item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires redis"]
    async fn index_entry_without_value_is_corrupt() {
        let store = RedisStore::open(&redis_url()).await.expect("redis connection failed");
        let id = uuid::Uuid::new_v4().to_string();

        let mut conn = store.conn.clone();
        let _: () = conn.zadd(INDEX_KEY, &id, 0).await.unwrap();

        let err = store
            .range(Window {
                offset: 0,
                limit: 1,
                before: DateTime::from_timestamp_micros(0),
            })
            .await
            .unwrap_err();

        let _: () = conn.zrem(INDEX_KEY, &id).await.unwrap();
        assert!(matches!(err, StoreError::Corrupt { id: ref got, .. } if *got == id));
    }
}
