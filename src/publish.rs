use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Scheduled,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Scheduled => "scheduled",
        }
    }

    /// Unknown strings normalize to draft.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim() {
            "published" => PostStatus::Published,
            "scheduled" => PostStatus::Scheduled,
            _ => PostStatus::Draft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication {
    pub status: PostStatus,
    pub published_at: Option<NaiveDateTime>,
}

/// Decide a post's publication triple from the editor's input and the clock.
///
/// - draft always clears the date
/// - published falls back requested date -> existing date -> now
/// - scheduled requires a resolvable date and collapses to published when
///   that date is not in the future
pub fn resolve_publication(
    requested_status: &str,
    requested_published_at: Option<&str>,
    existing_published_at: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Result<Publication, String> {
    let status = PostStatus::normalize(requested_status);
    let requested = requested_published_at.and_then(parse_datetime);

    match status {
        PostStatus::Draft => Ok(Publication {
            status: PostStatus::Draft,
            published_at: None,
        }),
        PostStatus::Published => Ok(Publication {
            status: PostStatus::Published,
            published_at: Some(requested.or(existing_published_at).unwrap_or(now)),
        }),
        PostStatus::Scheduled => {
            let date = requested
                .or(existing_published_at)
                .ok_or_else(|| "Scheduled posts require a publish date".to_string())?;

            if date <= now {
                // A schedule in the past takes effect immediately
                Ok(Publication {
                    status: PostStatus::Published,
                    published_at: Some(now),
                })
            } else {
                Ok(Publication {
                    status: PostStatus::Scheduled,
                    published_at: Some(date),
                })
            }
        }
    }
}

/// Unparseable input is treated as absent, never as a hard error.
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Flip every scheduled post whose publish time has elapsed to published.
/// Invoked at the start of every public post read, not on a timer.
pub fn publish_due_scheduled(pool: &DbPool) -> Result<usize, String> {
    let conn = pool.get().map_err(|e| e.to_string())?;
    let now = chrono::Utc::now().naive_utc();
    let updated = conn
        .execute(
            "UPDATE posts SET status = 'published', updated_at = CURRENT_TIMESTAMP
             WHERE status = 'scheduled' AND published_at <= ?1",
            params![now],
        )
        .map_err(|e| e.to_string())?;
    if updated > 0 {
        log::info!("Published {} due scheduled post(s)", updated);
    }
    Ok(updated)
}
