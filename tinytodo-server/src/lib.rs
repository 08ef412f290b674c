//! tinytodo-server: TODO items over HTTP with cursor pagination
//!
//! Layers, leaves first:
//! - [`cursor`]: opaque pagination tokens
//! - [`store`]: the `ItemStore` trait and its memory / sqlite / redis backends
//! - [`resolvers`]: queries and mutations on top of a store
//! - [`http`]: axum routes exposing the resolvers

pub mod cursor;
pub mod http;
pub mod models;
pub mod resolvers;
pub mod store;

pub use cursor::{Cursor, CursorError};
pub use http::{run_server, ServerConfig};
pub use resolvers::{ResolveError, Resolver};
pub use store::{ItemStore, StoreConfig, StoreError};
