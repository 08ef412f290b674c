//! Mutation resolvers: add and remove items

use uuid::Uuid;

use super::{ResolveError, Resolver};
use crate::models::{Item, NewItem};

impl Resolver {
    /// Validate, stamp and persist a new item.
    pub async fn add_item(
        &self,
        title: &str,
        content: Option<&str>,
    ) -> Result<Item, ResolveError> {
        let new_item = NewItem::new(title, content)?;

        let item = Item {
            id: Uuid::new_v4().to_string(),
            title: new_item.title.into_string(),
            content: new_item.content.map(|c| c.into_string()),
            created_at: self.clock.tick(),
        };

        self.store.insert(&item).await?;
        tracing::debug!(id = %item.id, "Added item");

        Ok(item)
    }

    /// Remove an item. Succeeds for ids that do not exist.
    pub async fn remove_item(&self, id: &str) -> Result<bool, ResolveError> {
        self.store.remove(id).await?;
        tracing::debug!(id = %id, "Removed item");

        Ok(true)
    }
}
