//! Item Feed Manager
//!
//! Owns the in-memory feed, mediates every read and write against the
//! stores, and reconciles local state after each operation. The local
//! list only changes on confirmed store success, so a failure leaves the
//! previous (stale but intact) view available.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::error;

use super::notify::Notifier;
use super::queries;
use crate::domain::{FeedError, FeedResult, Item, ItemDraft, ItemId};
use crate::repository::{AssetStore, ItemPatch, ItemStore};

/// Feed state and command surface consumed by the presentation layer
pub struct FeedManager<S: ItemStore, A: AssetStore> {
    store: S,
    assets: A,
    notifier: Arc<dyn Notifier>,
    items: Vec<Item>,
    loading: bool,
}

impl<S: ItemStore, A: AssetStore> FeedManager<S, A> {
    pub fn new(store: S, assets: A, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            assets,
            notifier,
            items: Vec::new(),
            loading: false,
        }
    }

    /// Items from the last successful sync, newest first
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// True while a `load` is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch all items and replace the local list wholesale
    pub async fn load(&mut self) -> FeedResult<()> {
        self.loading = true;
        let result = self.store.list().await;
        self.loading = false;

        match result {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(e) => {
                error!("failed to load items: {}", e);
                self.notifier.error("Failed to load items");
                Err(e)
            }
        }
    }

    /// Validate and submit a draft, then prepend the stored record
    ///
    /// New items are newest, so prepending preserves the descending
    /// `created_at` order without a reload. An invalid draft never
    /// reaches the store.
    pub async fn add_item(&mut self, draft: ItemDraft) -> FeedResult<Item> {
        if let Err(e) = draft.validate() {
            self.notifier.error("Please fill in all required fields");
            return Err(e);
        }

        match self.store.insert(&draft).await {
            Ok(item) => {
                self.items.insert(0, item.clone());
                self.notifier.success("Item posted successfully!");
                Ok(item)
            }
            Err(e) => {
                error!("failed to post item: {}", e);
                self.notifier.error("Failed to post item");
                Err(e)
            }
        }
    }

    /// Resolve an item: one-way, and only for a currently-unresolved id
    ///
    /// The store write happens first; the local copy is merged
    /// field-by-field after the store confirms, so derived counts update
    /// without a reload.
    pub async fn mark_resolved(&mut self, id: ItemId) -> FeedResult<Item> {
        let pos = match self.items.iter().position(|i| i.id == id && !i.resolved) {
            Some(pos) => pos,
            None => {
                self.notifier.error("Failed to mark item as found");
                return Err(FeedError::NotFound(format!(
                    "no unresolved item with id {}",
                    id
                )));
            }
        };

        let resolved_at = Utc::now();
        match self.store.update(id, &ItemPatch::resolve(resolved_at)).await {
            Ok(()) => {
                self.items[pos].resolve(resolved_at);
                self.notifier.success("Item marked as found!");
                Ok(self.items[pos].clone())
            }
            Err(e) => {
                error!("failed to mark item {} as found: {}", id, e);
                self.notifier.error("Failed to mark item as found");
                Err(e)
            }
        }
    }

    /// Upload a photo and return its public URL
    ///
    /// `data` is a base64 payload, with or without a `data:...;base64,`
    /// prefix. Does not touch the feed; callers attach the returned URL
    /// to a later `add_item`.
    pub async fn upload_image(&self, file_name: &str, data: &str) -> FeedResult<String> {
        let bytes = match decode_image_payload(data) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("failed to decode image payload: {}", e);
                self.notifier.error("Failed to upload image");
                return Err(e);
            }
        };

        let key = storage_key(file_name, &bytes, Utc::now());
        match self.assets.upload(&key, &bytes).await {
            Ok(()) => Ok(self.assets.public_url(&key)),
            Err(e) => {
                error!("failed to upload image {}: {}", key, e);
                self.notifier.error("Failed to upload image");
                Err(e)
            }
        }
    }

    /// Items for the current resolved-visibility toggle
    pub fn visible(&self, show_resolved: bool) -> Vec<Item> {
        queries::visible_items(&self.items, show_resolved)
    }

    /// Current feed counters
    pub fn counts(&self) -> queries::FeedCounts {
        queries::counts(&self.items)
    }
}

/// Strip an optional data-URL prefix and decode the base64 payload
fn decode_image_payload(data: &str) -> FeedResult<Vec<u8>> {
    // The payload may carry a prefix like "data:image/png;base64,"
    let base64_data = if data.contains(',') {
        data.split(',').nth(1).unwrap_or(data)
    } else {
        data
    };

    base64::Engine::decode(
        &base64::engine::general_purpose::STANDARD,
        base64_data.trim(),
    )
    .map_err(|e| FeedError::Upload(format!("failed to decode base64: {}", e)))
}

/// Collision-resistant storage key, independent of any user-supplied text
///
/// Millisecond timestamp, short content hash, sanitized file extension.
fn storage_key(file_name: &str, bytes: &[u8], now: DateTime<Utc>) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin")
        .to_ascii_lowercase();

    let hash = blake3::hash(bytes);
    let hex = hash.to_hex();
    format!("{}-{}.{}", now.timestamp_millis(), &hex.as_str()[..8], ext)
}
