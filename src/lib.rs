//! Lost & Found Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - feed: Feed state management, derived views and notifications
//! - config: JSON configuration for the embedding shell

use std::sync::Arc;

mod config;
mod domain;
mod feed;
mod repository;

pub use config::BoardConfig;
pub use domain::{FeedError, FeedResult, Item, ItemDraft, ItemId, ItemType};
pub use feed::{
    counts, sorted_by_recency, time_since, visible_items, FeedCounts, FeedManager, LogNotifier,
    Notifier,
};
pub use repository::{
    init_db, AssetRepository, AssetStore, ItemPatch, ItemRepository, ItemStore, SharedConnection,
};

/// Wire a ready-to-use feed manager from a configuration
///
/// Opens the board database (running migrations) and the asset directory,
/// and installs the log-backed notifier. Callers that need a different
/// notifier construct `FeedManager` directly.
pub fn open_board(
    config: &BoardConfig,
) -> FeedResult<FeedManager<ItemRepository, AssetRepository>> {
    let conn = init_db(&config.db_path)?;
    let store = ItemRepository::new(conn);
    let assets = AssetRepository::new(config.assets_dir.clone(), &config.public_base_url);
    Ok(FeedManager::new(store, assets, Arc::new(LogNotifier)))
}
