//! Derived Feed Views
//!
//! Pure functions over the local item list. Everything the UI displays
//! about the feed (filtering, ordering, counters, relative time) comes
//! from here so there is one source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemType};

/// Feed counters shown in the board header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCounts {
    /// Unresolved lost postings
    pub lost: usize,
    /// Unresolved found postings
    pub found: usize,
    /// Postings already resolved
    pub resolved: usize,
    /// Every posting, resolved or not
    pub total: usize,
}

/// Items to display for the current resolved-visibility toggle
///
/// `show_resolved = false` hides resolved items; `true` keeps all.
pub fn visible_items(items: &[Item], show_resolved: bool) -> Vec<Item> {
    items
        .iter()
        .filter(|item| show_resolved || !item.resolved)
        .cloned()
        .collect()
}

/// Newest-first ordering by `created_at`
///
/// The sort is stable: items sharing a timestamp keep their relative
/// order.
pub fn sorted_by_recency(items: &[Item]) -> Vec<Item> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Count postings per feed bucket
pub fn counts(items: &[Item]) -> FeedCounts {
    let mut c = FeedCounts {
        lost: 0,
        found: 0,
        resolved: 0,
        total: items.len(),
    };
    for item in items {
        if item.resolved {
            c.resolved += 1;
        } else {
            match item.item_type {
                ItemType::Lost => c.lost += 1,
                ItemType::Found => c.found += 1,
            }
        }
    }
    c
}

/// Human label for how long ago something was posted
///
/// `now` is injected so the label is a pure function of two timestamps.
pub fn time_since(posted_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - posted_at;
    let hours = elapsed.num_hours();
    if hours < 1 {
        "Just posted".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}
