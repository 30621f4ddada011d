use rusqlite::types::ValueRef;
use serde_json::{json, Map, Value};

use crate::db::DbPool;

pub const BACKUP_FORMAT: &str = "sysfolio-backup";
pub const BACKUP_VERSION: i64 = 1;

/// Content tables captured in a backup, with the columns that round-trip.
/// Order matters only for readability of the exported document.
const BACKUP_TABLES: &[(&str, &[&str])] = &[
    (
        "about",
        &["id", "title", "content", "skills", "avatar", "created_at", "updated_at"],
    ),
    (
        "projects",
        &[
            "id",
            "title",
            "description",
            "technologies",
            "image",
            "github_link",
            "live_link",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "certificates",
        &["id", "title", "description", "image", "issue_date", "created_at", "updated_at"],
    ),
    (
        "posts",
        &[
            "id",
            "title",
            "slug",
            "content",
            "excerpt",
            "featured_image",
            "status",
            "published_at",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "tasks",
        &[
            "id",
            "title",
            "description",
            "status",
            "priority",
            "due_date",
            "created_at",
            "updated_at",
        ],
    ),
    (
        "media",
        &["id", "filename", "original_name", "url", "created_at"],
    ),
    ("site_settings", &["key", "value"]),
];

fn column_to_json(raw: ValueRef) -> Value {
    match raw {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => json!(i),
        ValueRef::Real(f) => json!(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).to_string()),
        // No blob columns exist in the backup tables
        ValueRef::Blob(_) => Value::Null,
    }
}

fn json_to_sql(value: Option<&Value>) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;
    match value {
        None | Some(Value::Null) => Sql::Null,
        Some(Value::Bool(b)) => Sql::Integer(*b as i64),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Sql::Integer(i)
            } else {
                Sql::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        Some(Value::String(s)) => Sql::Text(s.clone()),
        // Nested values are stored as their JSON text
        Some(other) => Sql::Text(other.to_string()),
    }
}

fn fetch_table_rows(
    conn: &rusqlite::Connection,
    table: &str,
    columns: &[&str],
) -> Result<Vec<Value>, String> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {} ASC",
        columns.join(", "),
        table,
        columns[0],
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| e.to_string())?;

    let rows = stmt
        .query_map([], |row| {
            let mut map = Map::new();
            for (i, col) in columns.iter().enumerate() {
                map.insert(col.to_string(), column_to_json(row.get_ref(i)?));
            }
            Ok(Value::Object(map))
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(rows)
}

/// Snapshot every content table into the versioned backup envelope.
pub fn build_backup_payload(pool: &DbPool) -> Result<Value, String> {
    let conn = pool.get().map_err(|e| e.to_string())?;

    let mut data = Map::new();
    for (table, columns) in BACKUP_TABLES {
        data.insert(
            table.to_string(),
            Value::Array(fetch_table_rows(&conn, table, columns)?),
        );
    }

    Ok(json!({
        "format": BACKUP_FORMAT,
        "version": BACKUP_VERSION,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "data": Value::Object(data),
    }))
}

/// A document is acceptable iff the format tag matches and `data` is an
/// object. Anything else is rejected outright.
pub fn is_valid_backup_payload(doc: &Value) -> bool {
    doc.get("format").and_then(Value::as_str) == Some(BACKUP_FORMAT)
        && doc.get("data").map(Value::is_object).unwrap_or(false)
}

/// Replace the contents of all backup tables with the document's rows,
/// inside a single transaction. Either every table is swapped or none is:
/// the transaction rolls back on drop if any step fails, and concurrent
/// readers never observe a partially-cleared state.
///
/// A missing or non-array table list clears that table.
pub fn apply_backup_data(pool: &DbPool, doc: &Value) -> Result<(), String> {
    if !is_valid_backup_payload(doc) {
        return Err("Unsupported backup format".to_string());
    }

    let data = &doc["data"];
    let mut conn = pool.get().map_err(|e| e.to_string())?;
    let tx = conn.transaction().map_err(|e| e.to_string())?;

    for (table, columns) in BACKUP_TABLES {
        tx.execute(&format!("DELETE FROM {}", table), [])
            .map_err(|e| e.to_string())?;
        tx.execute(
            "DELETE FROM sqlite_sequence WHERE name = ?1",
            rusqlite::params![table],
        )
        .map_err(|e| e.to_string())?;

        let rows = match data.get(*table).and_then(Value::as_array) {
            Some(rows) => rows,
            None => continue,
        };

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", "),
        );
        let mut stmt = tx.prepare(&insert_sql).map_err(|e| e.to_string())?;

        for row in rows {
            let values: Vec<rusqlite::types::Value> =
                columns.iter().map(|col| json_to_sql(row.get(*col))).collect();
            stmt.execute(rusqlite::params_from_iter(values))
                .map_err(|e| format!("{}: {}", table, e))?;
        }
    }

    tx.commit().map_err(|e| e.to_string())
}
