use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::db::DbPool;
use crate::models::settings::Setting;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Media {
    pub id: i64,
    pub filename: String,
    pub original_name: String,
    pub url: String,
    pub created_at: NaiveDateTime,
}

impl Media {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Media {
            id: row.get("id")?,
            filename: row.get("filename")?,
            original_name: row.get("original_name")?,
            url: row.get("url")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM media WHERE id = ?1", params![id], Self::from_row)
            .ok()
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        conn.prepare("SELECT * FROM media ORDER BY created_at DESC")
            .and_then(|mut stmt| {
                stmt.query_map([], Self::from_row)
                    .map(|rows| rows.filter_map(|r| r.ok()).collect())
            })
            .unwrap_or_default()
    }

    pub fn create(
        pool: &DbPool,
        filename: &str,
        original_name: &str,
        url: &str,
    ) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO media (filename, original_name, url) VALUES (?1, ?2, ?3)",
            params![filename, original_name, url],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    /// Removes the row and the file on disk.
    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let media = Self::find_by_id(pool, id).ok_or("Media not found")?;

        let uploads = Setting::get_or(pool, "uploads_path", "website/uploads/");
        let _ = std::fs::remove_file(Path::new(&uploads).join(&media.filename));

        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM media WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
