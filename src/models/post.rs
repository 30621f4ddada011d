use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::publish::{self, Publication};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub status: String,
    pub published_at: Option<String>,
}

impl Post {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Post {
            id: row.get("id")?,
            title: row.get("title")?,
            slug: row.get("slug")?,
            content: row.get("content")?,
            excerpt: row.get("excerpt")?,
            featured_image: row.get("featured_image")?,
            status: row.get("status")?,
            published_at: row.get("published_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM posts WHERE id = ?1", params![id], Self::from_row)
            .ok()
    }

    pub fn find_by_slug(pool: &DbPool, slug: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM posts WHERE slug = ?1",
            params![slug],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool, status: Option<&str>) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };

        let result = match status {
            Some(s) => conn
                .prepare("SELECT * FROM posts WHERE status = ?1 ORDER BY created_at DESC")
                .and_then(|mut stmt| {
                    stmt.query_map(params![s], Self::from_row)
                        .map(|rows| rows.filter_map(|r| r.ok()).collect())
                }),
            None => conn
                .prepare("SELECT * FROM posts ORDER BY created_at DESC")
                .and_then(|mut stmt| {
                    stmt.query_map([], Self::from_row)
                        .map(|rows| rows.filter_map(|r| r.ok()).collect())
                }),
        };

        result.unwrap_or_default()
    }

    /// Published posts, newest first by publication date.
    /// Callers on the public surface must sweep due scheduled posts first.
    pub fn published(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        conn.prepare(
            "SELECT * FROM posts WHERE status = 'published' ORDER BY published_at DESC",
        )
        .and_then(|mut stmt| {
            stmt.query_map([], Self::from_row)
                .map(|rows| rows.filter_map(|r| r.ok()).collect())
        })
        .unwrap_or_default()
    }

    pub fn find_published_by_slug(pool: &DbPool, slug: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM posts WHERE slug = ?1 AND status = 'published'",
            params![slug],
            Self::from_row,
        )
        .ok()
    }

    pub fn count(pool: &DbPool, status: Option<&str>) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };

        match status {
            Some(s) => conn
                .query_row(
                    "SELECT COUNT(*) FROM posts WHERE status = ?1",
                    params![s],
                    |row| row.get(0),
                )
                .unwrap_or(0),
            None => conn
                .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
                .unwrap_or(0),
        }
    }

    pub fn create(pool: &DbPool, form: &PostForm) -> Result<i64, String> {
        let publication = resolve_form_publication(form, None)?;
        let slug = form_slug(form);

        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO posts (title, slug, content, excerpt, featured_image, status, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                form.title,
                slug,
                form.content,
                form.excerpt,
                form.featured_image,
                publication.status.as_str(),
                publication.published_at,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &PostForm) -> Result<(), String> {
        let existing = Self::find_by_id(pool, id).ok_or("Post not found")?;
        let publication = resolve_form_publication(form, existing.published_at)?;
        let slug = form_slug(form);

        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE posts SET title=?1, slug=?2, content=?3, excerpt=?4, featured_image=?5,
             status=?6, published_at=?7, updated_at=CURRENT_TIMESTAMP WHERE id=?8",
            params![
                form.title,
                slug,
                form.content,
                form.excerpt,
                form.featured_image,
                publication.status.as_str(),
                publication.published_at,
                id,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM posts WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

fn resolve_form_publication(
    form: &PostForm,
    existing_published_at: Option<NaiveDateTime>,
) -> Result<Publication, String> {
    publish::resolve_publication(
        &form.status,
        form.published_at.as_deref(),
        existing_published_at,
        chrono::Utc::now().naive_utc(),
    )
}

fn form_slug(form: &PostForm) -> String {
    match form.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => slug::slugify(s),
        _ => slug::slugify(&form.title),
    }
}
