//! Item Repository
//!
//! SQLite-backed implementation of the item store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Row};

use super::db::SharedConnection;
use super::traits::{ItemPatch, ItemStore};
use crate::domain::{FeedError, FeedResult, Item, ItemDraft, ItemId, ItemType};

const ITEM_COLUMNS: &str =
    "id, item_type, name, description, contact, place, date, image_url, resolved, resolved_at, created_at";

/// SQLite implementation of the item store
pub struct ItemRepository {
    conn: SharedConnection,
}

impl ItemRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn insert(&self, draft: &ItemDraft) -> FeedResult<Item> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(FeedError::Persist("Database not initialized".to_string()))?;

        // id and created_at are assigned here, in the same statement
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO items (item_type, name, description, contact, place, date, image_url, resolved, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)",
            params![
                draft.item_type.as_str(),
                draft.name,
                draft.description,
                draft.contact,
                draft.place,
                draft.date.map(|d| d.to_string()),
                draft.image_url,
                created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| FeedError::Persist(e.to_string()))?;

        let id = conn.last_insert_rowid();

        Ok(Item {
            id,
            item_type: draft.item_type,
            name: draft.name.clone(),
            description: draft.description.clone(),
            contact: draft.contact.clone(),
            place: draft.place.clone(),
            date: draft.date,
            image_url: draft.image_url.clone(),
            resolved: false,
            resolved_at: None,
            created_at,
        })
    }

    async fn list(&self) -> FeedResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(FeedError::Fetch("Database not initialized".to_string()))?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM items ORDER BY created_at DESC, id DESC",
                ITEM_COLUMNS
            ))
            .map_err(|e| FeedError::Fetch(e.to_string()))?;

        let mut rows = stmt
            .query([])
            .map_err(|e| FeedError::Fetch(e.to_string()))?;

        let mut items = Vec::new();
        while let Ok(Some(row)) = rows.next() {
            items.push(row_to_item(row)?);
        }
        Ok(items)
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> FeedResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(FeedError::Persist("Database not initialized".to_string()))?;

        let resolved_at = patch.resolved_at.map(|at| at.to_rfc3339());

        // All present fields go through one statement so the update is atomic
        let affected = match (patch.resolved, resolved_at) {
            (Some(resolved), Some(at)) => conn.execute(
                "UPDATE items SET resolved = ?, resolved_at = ? WHERE id = ?",
                params![if resolved { 1 } else { 0 }, at, id],
            ),
            (Some(resolved), None) => conn.execute(
                "UPDATE items SET resolved = ? WHERE id = ?",
                params![if resolved { 1 } else { 0 }, id],
            ),
            (None, Some(at)) => conn.execute(
                "UPDATE items SET resolved_at = ? WHERE id = ?",
                params![at, id],
            ),
            (None, None) => return Ok(()),
        }
        .map_err(|e| FeedError::Persist(e.to_string()))?;

        if affected == 0 {
            return Err(FeedError::Persist(format!("item {} missing from store", id)));
        }
        Ok(())
    }
}

/// Convert a database row to Item
fn row_to_item(row: &Row<'_>) -> FeedResult<Item> {
    let date: Option<String> = row.get::<_, Option<String>>(6).ok().flatten();
    let resolved_at: Option<String> = row.get::<_, Option<String>>(9).ok().flatten();
    let created_at: String = row
        .get::<_, String>(10)
        .map_err(|e| FeedError::Fetch(e.to_string()))?;

    Ok(Item {
        id: row
            .get::<_, i64>(0)
            .map_err(|e| FeedError::Fetch(e.to_string()))?,
        item_type: ItemType::from_str(
            &row.get::<_, String>(1).unwrap_or_else(|_| "lost".to_string()),
        ),
        name: row
            .get::<_, String>(2)
            .map_err(|e| FeedError::Fetch(e.to_string()))?,
        description: row.get::<_, String>(3).unwrap_or_default(),
        contact: row.get::<_, String>(4).unwrap_or_default(),
        place: row.get::<_, String>(5).unwrap_or_default(),
        date: date.and_then(|s| s.parse::<NaiveDate>().ok()),
        image_url: row.get::<_, Option<String>>(7).ok().flatten(),
        resolved: row.get::<_, i32>(8).unwrap_or(0) != 0,
        resolved_at: resolved_at.and_then(|s| parse_timestamp(&s).ok()),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn parse_timestamp(s: &str) -> FeedResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FeedError::Fetch(format!("bad timestamp {}: {}", s, e)))
}
