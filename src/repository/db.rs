//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{FeedError, FeedResult};

/// Connection handle shared by the repositories
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Open (or create) the board database and bring the schema up to date
///
/// `:memory:` works as a path for tests.
pub fn init_db(db_path: &Path) -> FeedResult<SharedConnection> {
    let conn = Connection::open(db_path)
        .map_err(|e| FeedError::Persist(format!("failed to open database: {}", e)))?;

    run_migrations(&conn)?;

    Ok(Arc::new(Mutex::new(Some(conn))))
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    if let Ok(mut stmt) = conn.prepare(&query) {
        if let Ok(mut rows) = stmt.query([]) {
            while let Ok(Some(row)) = rows.next() {
                if let Ok(name) = row.get::<_, String>(1) {
                    if name == column {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> FeedResult<()> {
    // Items table - create if not exists
    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_type TEXT NOT NULL DEFAULT 'lost',
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            contact TEXT NOT NULL,
            place TEXT NOT NULL,
            date TEXT,
            image_url TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| FeedError::Persist(e.to_string()))?;

    // Resolution columns shipped after the first schema: add if missing
    if !column_exists(conn, "items", "resolved") {
        conn.execute(
            "ALTER TABLE items ADD COLUMN resolved INTEGER NOT NULL DEFAULT 0",
            [],
        )
        .map_err(|e| FeedError::Persist(format!("failed to add resolved: {}", e)))?;
    }

    if !column_exists(conn, "items", "resolved_at") {
        conn.execute("ALTER TABLE items ADD COLUMN resolved_at TEXT", [])
            .map_err(|e| FeedError::Persist(format!("failed to add resolved_at: {}", e)))?;
    }

    // Index backing the recency ordering
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_created ON items(created_at)",
        [],
    )
    .map_err(|e| FeedError::Persist(e.to_string()))?;

    Ok(())
}
