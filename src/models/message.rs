use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

impl ContactMessage {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let read_raw: i64 = row.get("read")?;
        Ok(ContactMessage {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
            message: row.get("message")?,
            read: read_raw != 0,
            created_at: row.get("created_at")?,
        })
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        conn.prepare("SELECT * FROM messages ORDER BY created_at DESC")
            .and_then(|mut stmt| {
                stmt.query_map([], Self::from_row)
                    .map(|rows| rows.filter_map(|r| r.ok()).collect())
            })
            .unwrap_or_default()
    }

    pub fn create(pool: &DbPool, name: &str, email: &str, message: &str) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO messages (name, email, message) VALUES (?1, ?2, ?3)",
            params![name, email, message],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn mark_read(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("UPDATE messages SET read = 1 WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM messages WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn unread_count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM messages WHERE read = 0", [], |row| {
            row.get(0)
        })
        .unwrap_or(0)
    }
}
