//! Item model and its validated inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for item titles
const MAX_TITLE_LEN: usize = 256;

/// Maximum length for item content, in characters
const MAX_CONTENT_LEN: usize = 65536;

/// A TODO item.
///
/// `created_at` is assigned once at insert time and is the total order
/// used for pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated item title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTitle(String);

impl ItemTitle {
    /// Create a new item title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 256 characters
    ///
    /// # Example
    /// ```
    /// use tinytodo_server::models::ItemTitle;
    ///
    /// assert!(ItemTitle::new("Buy milk").is_ok());
    /// assert!(ItemTitle::new("").is_err());
    /// assert!(ItemTitle::new("   ").is_err());  // whitespace only
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validated item content. Empty content is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemContent(String);

impl ItemContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.chars().count() > MAX_CONTENT_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_CONTENT_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Arguments for the add-item mutation, validated at construction.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: ItemTitle,
    pub content: Option<ItemContent>,
}

impl NewItem {
    pub fn new(title: &str, content: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            title: ItemTitle::new(title)?,
            content: content.map(ItemContent::new).transpose()?,
        })
    }
}
