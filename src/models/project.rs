use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub technologies: String,
    pub image: String,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub technologies: String,
    pub image: Option<String>,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
}

impl Project {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Project {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            technologies: row.get("technologies")?,
            image: row.get("image")?,
            github_link: row.get("github_link")?,
            live_link: row.get("live_link")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM projects WHERE id = ?1", params![id], Self::from_row)
            .ok()
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare("SELECT * FROM projects ORDER BY created_at DESC") {
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
        conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn create(pool: &DbPool, form: &ProjectForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let image = form.image.as_deref().unwrap_or("/images/default-project.svg");
        conn.execute(
            "INSERT INTO projects (title, description, technologies, image, github_link, live_link)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                form.title,
                form.description,
                form.technologies,
                image,
                form.github_link,
                form.live_link,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &ProjectForm) -> Result<(), String> {
        let current = Self::find_by_id(pool, id).ok_or("Project not found")?;
        let conn = pool.get().map_err(|e| e.to_string())?;
        let image = form.image.as_deref().unwrap_or(&current.image);
        conn.execute(
            "UPDATE projects SET title=?1, description=?2, technologies=?3, image=?4,
             github_link=?5, live_link=?6, updated_at=CURRENT_TIMESTAMP WHERE id=?7",
            params![
                form.title,
                form.description,
                form.technologies,
                image,
                form.github_link,
                form.live_link,
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM projects WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
