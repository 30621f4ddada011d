use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

fn normalize_priority(raw: Option<&str>) -> &'static str {
    match raw.map(str::trim) {
        Some("low") => "low",
        Some("high") => "high",
        _ => "normal",
    }
}

fn parse_due_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    let s = raw?.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl Task {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Task {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            status: row.get("status")?,
            priority: row.get("priority")?,
            due_date: row.get("due_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Open tasks first, high priority before low, oldest first within a group.
    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        conn.prepare(
            "SELECT * FROM tasks ORDER BY
               CASE status WHEN 'open' THEN 0 ELSE 1 END,
               CASE priority WHEN 'high' THEN 0 WHEN 'normal' THEN 1 ELSE 2 END,
               created_at ASC",
        )
        .and_then(|mut stmt| {
            stmt.query_map([], Self::from_row)
                .map(|rows| rows.filter_map(|r| r.ok()).collect())
        })
        .unwrap_or_default()
    }

    pub fn create(pool: &DbPool, form: &TaskForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO tasks (title, description, priority, due_date) VALUES (?1, ?2, ?3, ?4)",
            params![
                form.title,
                form.description,
                normalize_priority(form.priority.as_deref()),
                parse_due_date(form.due_date.as_deref()),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &TaskForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE tasks SET title=?1, description=?2, priority=?3, due_date=?4,
             updated_at=CURRENT_TIMESTAMP WHERE id=?5",
            params![
                form.title,
                form.description,
                normalize_priority(form.priority.as_deref()),
                parse_due_date(form.due_date.as_deref()),
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn set_status(pool: &DbPool, id: i64, status: &str) -> Result<(), String> {
        let status = if status == "done" { "done" } else { "open" };
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE tasks SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
            params![status, id],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
