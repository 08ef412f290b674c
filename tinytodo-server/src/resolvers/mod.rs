//! Resolvers - the operations the API exposes
//!
//! Query side: paginated item listing and lookup by id.
//! Mutation side: add and remove.
//!
//! Resolvers are stateless across requests; pagination state travels in the
//! cursor token.

use std::sync::Arc;

use crate::cursor::CursorError;
use crate::models::{PageLimits, ValidationError};
use crate::store::{ItemStore, StoreError};

pub mod clock;
mod mutation;
mod query;

pub use clock::ItemClock;

/// Error from a resolver call. Never accompanied by a partial result.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid cursor: {0}")]
    Cursor(#[from] CursorError),

    #[error("invalid argument: {0}")]
    Validation(#[from] ValidationError),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

/// Entry point for queries and mutations against one item store
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn ItemStore>,
    limits: PageLimits,
    clock: Arc<ItemClock>,
}

impl Resolver {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            limits: PageLimits::default(),
            clock: Arc::new(ItemClock::new()),
        }
    }

    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }
}
