//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod item;
pub mod pagination;
pub mod validation;

pub use item::{Item, ItemContent, ItemTitle, NewItem};
pub use pagination::{Connection, Edge, PageInfo, PageLimits};
pub use validation::ValidationError;
