//! Repository Layer - Store Contracts
//!
//! Defines the abstract interfaces for the item store and the asset
//! (photo blob) store. Implementations can use SQLite, the filesystem,
//! in-memory doubles, etc.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FeedResult, Item, ItemDraft, ItemId};

/// Partial update applied to a stored item
///
/// Only fields that are `Some` are written, and the store applies all of
/// them in one statement so callers never observe a half-applied patch.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub resolved: Option<bool>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ItemPatch {
    /// The patch for the one-way resolved transition
    pub fn resolve(at: DateTime<Utc>) -> Self {
        Self {
            resolved: Some(true),
            resolved_at: Some(at),
        }
    }
}

/// Persistent collection of items
///
/// The store owns `id` and `created_at`: both are assigned at insert and
/// never accepted from callers. Failures surface as `Fetch` (reads) or
/// `Persist` (writes); `Validation` and `NotFound` belong to the feed
/// manager, not to stores.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a draft, assigning `id` and `created_at`, and return the
    /// authoritative record
    async fn insert(&self, draft: &ItemDraft) -> FeedResult<Item>;

    /// All items, newest first by `created_at`
    async fn list(&self) -> FeedResult<Vec<Item>>;

    /// Apply a partial update to one item
    async fn update(&self, id: ItemId, patch: &ItemPatch) -> FeedResult<()>;
}

/// Blob storage for item photos
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store a blob under the given key
    async fn upload(&self, key: &str, bytes: &[u8]) -> FeedResult<()>;

    /// Public URL a browser can fetch the blob from
    fn public_url(&self, key: &str) -> String;
}
