use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::db::DbPool;
use crate::models::settings::Setting;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Certificate {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    pub issue_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct CertificateForm {
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    pub issue_date: Option<String>,
}

impl Certificate {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Certificate {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            image: row.get("image")?,
            issue_date: row.get("issue_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM certificates WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt =
            match conn.prepare("SELECT * FROM certificates ORDER BY issue_date DESC") {
                Ok(s) => s,
                Err(_) => return vec![],
            };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM certificates", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn create(pool: &DbPool, form: &CertificateForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let issue_date: Option<NaiveDateTime> = form
            .issue_date
            .as_ref()
            .and_then(|s| parse_issue_date(s));
        conn.execute(
            "INSERT INTO certificates (title, description, image, issue_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![form.title, form.description, form.image, issue_date],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    /// Removes the row and its image file under the uploads directory.
    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let cert = Self::find_by_id(pool, id).ok_or("Certificate not found")?;

        if cert.image.starts_with("/uploads/") {
            let uploads = Setting::get_or(pool, "uploads_path", "website/uploads/");
            let name = cert.image.trim_start_matches("/uploads/");
            let _ = std::fs::remove_file(Path::new(&uploads).join(name));
        }

        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM certificates WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

fn parse_issue_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
