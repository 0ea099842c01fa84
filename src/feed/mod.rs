//! Item Feed
//!
//! Feed state management: the manager that mediates the stores, the
//! derived view queries, and the notification seam.

mod manager;
mod notify;
pub mod queries;

#[cfg(test)]
mod tests;

pub use manager::FeedManager;
pub use notify::{LogNotifier, Notifier};
pub use queries::{counts, sorted_by_recency, time_since, visible_items, FeedCounts};
