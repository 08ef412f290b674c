//! Query resolvers: cursor pagination and lookup by id

use super::{ResolveError, Resolver};
use crate::cursor::Cursor;
use crate::models::{Connection, Edge, Item, PageInfo};
use crate::store::Window;

impl Resolver {
    /// Resolve one page of items.
    ///
    /// Without `after` the page starts at offset 0 and is fenced at the
    /// current time. With `after` the offset and fence come from the cursor;
    /// the cursor's page size wins over `first` when it carries one.
    ///
    /// The store is asked for one row past the page; `has_next_page` is
    /// true when that row exists. The end cursor always advances by the page
    /// size, so following it past the last item yields an empty page.
    pub async fn items(
        &self,
        first: Option<u32>,
        after: Option<&str>,
    ) -> Result<Connection<Item>, ResolveError> {
        let requested = self.limits.resolve(first)?;

        let (window, carried_limit) = match after {
            None => (
                Window {
                    offset: 0,
                    limit: requested,
                    before: Some(self.clock.now()),
                },
                None,
            ),
            Some(token) => {
                let cursor = Cursor::decode(token)?;
                let carried = cursor.limit.map(|l| l.clamp(1, self.limits.max_first));
                (
                    Window {
                        offset: cursor.start,
                        limit: carried.unwrap_or(requested),
                        before: cursor.before,
                    },
                    carried,
                )
            }
        };

        let mut items = self
            .store
            .range(Window {
                limit: window.limit.saturating_add(1),
                ..window
            })
            .await?;
        let has_next_page = items.len() > window.limit as usize;
        items.truncate(window.limit as usize);

        let cursor_at = |position: u64| {
            Cursor::new(position)
                .with_limit(carried_limit)
                .with_before(window.before)
                .encode()
        };

        let page_info = PageInfo {
            has_previous_page: window.offset > 0,
            has_next_page,
            start_cursor: cursor_at(window.offset),
            end_cursor: cursor_at(window.offset.saturating_add(u64::from(window.limit))),
        };

        tracing::debug!(
            offset = window.offset,
            limit = window.limit,
            returned = items.len(),
            has_next = page_info.has_next_page,
            "Resolved items page"
        );

        let edges = items
            .into_iter()
            .enumerate()
            .map(|(i, node)| Edge {
                cursor: cursor_at(window.offset.saturating_add(i as u64)),
                node,
            })
            .collect();

        Ok(Connection { edges, page_info })
    }

    /// Look up a single item by id.
    pub async fn item(&self, id: &str) -> Result<Option<Item>, ResolveError> {
        Ok(self.store.get(id).await?)
    }

    /// Check that the backing store answers.
    pub async fn ping(&self) -> Result<(), ResolveError> {
        Ok(self.store.ping().await?)
    }
}
