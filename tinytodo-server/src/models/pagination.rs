//! Pagination types

use serde::Serialize;

use super::ValidationError;

/// Maximum items per page
const MAX_FIRST: u32 = 100;

/// Default items per page
const DEFAULT_FIRST: u32 = 20;

/// Page size policy applied to every items query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_first: u32,
    pub max_first: u32,
}

impl PageLimits {
    /// Resolve a requested page size.
    ///
    /// - Omitted uses the default
    /// - Zero is rejected
    /// - Anything above the max is clamped
    pub fn resolve(&self, first: Option<u32>) -> Result<u32, ValidationError> {
        match first {
            None => Ok(self.default_first.clamp(1, self.max_first)),
            Some(0) => Err(ValidationError::NotPositive { field: "first" }),
            Some(n) => Ok(n.min(self.max_first)),
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_first: DEFAULT_FIRST,
            max_first: MAX_FIRST,
        }
    }
}

/// One page of results in the Relay connection shape
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

/// A node together with the cursor that addresses its position
#[derive(Debug, Clone, Serialize)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: String,
    pub end_cursor: String,
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }
}
