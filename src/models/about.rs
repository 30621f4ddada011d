use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct About {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub skills: String,
    pub avatar: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct AboutForm {
    pub title: String,
    pub content: String,
    pub skills: String,
    pub avatar: Option<String>,
}

impl About {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(About {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            skills: row.get("skills")?,
            avatar: row.get("avatar")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn get(pool: &DbPool) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM about ORDER BY id LIMIT 1", [], Self::from_row)
            .ok()
    }

    /// Fetch the profile row, creating it with seeded defaults on first read.
    pub fn get_or_seed(pool: &DbPool) -> Result<Self, String> {
        if let Some(about) = Self::get(pool) {
            return Ok(about);
        }

        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO about (title, content, skills, avatar) VALUES (?1, ?2, ?3, ?4)",
            params![
                "Komron Juraev",
                "System Administrator & Security Enthusiast",
                "RouterOS, Windows Server, Linux, Zabbix, Python, C#",
                "/images/default-avatar.svg",
            ],
        )
        .map_err(|e| e.to_string())?;

        Self::get(pool).ok_or_else(|| "Failed to seed about row".to_string())
    }

    pub fn update(pool: &DbPool, form: &AboutForm) -> Result<(), String> {
        let current = Self::get_or_seed(pool)?;
        let conn = pool.get().map_err(|e| e.to_string())?;
        let avatar = form.avatar.as_deref().unwrap_or(&current.avatar);
        conn.execute(
            "UPDATE about SET title=?1, content=?2, skills=?3, avatar=?4,
             updated_at=CURRENT_TIMESTAMP WHERE id=?5",
            params![form.title, form.content, form.skills, avatar, current.id],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}
