//! Item Entity
//!
//! A lost-or-found posting on the campus bulletin board.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::{FeedError, FeedResult};

/// Unique identifier assigned by the item store
pub type ItemId = i64;

/// Whether the poster lost the item or found someone else's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// The poster is looking for this item
    Lost,
    /// The poster picked this item up and wants to return it
    Found,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Lost => "lost",
            ItemType::Found => "found",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "found" => ItemType::Found,
            _ => ItemType::Lost,
        }
    }
}

/// A posted item as returned by the item store
///
/// `id` and `created_at` are assigned by the store at insert and never
/// supplied by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Store-assigned unique identifier
    pub id: ItemId,
    /// Lost or found
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Short label for the item ("Blue backpack")
    pub name: String,
    /// Longer free-text description
    pub description: String,
    /// How to reach the poster
    pub contact: String,
    /// Where the item was lost or found
    pub place: String,
    /// When the loss or find happened (user supplied, distinct from created_at)
    pub date: Option<NaiveDate>,
    /// Public URL of an uploaded photo
    pub image_url: Option<String>,
    /// Whether the posting has been resolved
    pub resolved: bool,
    /// Set exactly when `resolved` flips to true
    pub resolved_at: Option<DateTime<Utc>>,
    /// Store-assigned creation time, the feed sort key
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Apply the one-way resolved transition to this copy
    pub fn resolve(&mut self, at: DateTime<Utc>) {
        self.resolved = true;
        self.resolved_at = Some(at);
    }
}

/// A submission that has not been persisted yet
///
/// Drafts carry everything the poster controls; the store adds `id` and
/// `created_at` when the draft is inserted. Preview-only data stays in a
/// draft and never reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    pub description: String,
    pub contact: String,
    pub place: String,
    pub date: Option<NaiveDate>,
    pub image_url: Option<String>,
}

impl ItemDraft {
    /// Check that every required text field is present and non-empty
    ///
    /// The type field is an enum and cannot be empty, so only the four
    /// free-text fields are checked.
    pub fn validate(&self) -> FeedResult<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.contact.trim().is_empty() {
            missing.push("contact");
        }
        if self.place.trim().is_empty() {
            missing.push("place");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FeedError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}
