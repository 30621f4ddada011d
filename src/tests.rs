#![cfg(test)]

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::collections::HashMap;
use std::io::Write;

use crate::auth;
use crate::backup;
use crate::db::{run_migrations, seed_defaults, DbPool};
use crate::models::about::About;
use crate::models::audit::AuditEntry;
use crate::models::media::Media;
use crate::models::message::ContactMessage;
use crate::models::post::{Post, PostForm};
use crate::models::project::{Project, ProjectForm};
use crate::models::settings::{Setting, SiteSetting};
use crate::models::task::{Task, TaskForm};
use crate::package;
use crate::publish::{self, PostStatus};
use crate::site;

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Create a fresh in-memory SQLite pool with all migrations + seed defaults applied.
/// Uses a named shared-cache in-memory DB so multiple connections see the same data.
/// Pre-seeds admin_password_hash with a fast bcrypt hash to avoid the expensive
/// DEFAULT_COST hash in seed_defaults (which can take 60s+ in debug builds).
fn test_pool() -> DbPool {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    run_migrations(&pool).expect("Failed to run migrations");
    {
        let conn = pool.get().unwrap();
        let fast = bcrypt::hash("admin", 4).unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES ('admin_password_hash', ?1)",
            rusqlite::params![fast],
        )
        .unwrap();
    }
    seed_defaults(&pool).expect("Failed to seed defaults");
    pool
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn make_post_form(title: &str, status: &str, published_at: Option<&str>) -> PostForm {
    PostForm {
        title: title.to_string(),
        slug: None,
        content: "<p>test</p>".to_string(),
        excerpt: Some("excerpt".to_string()),
        featured_image: None,
        status: status.to_string(),
        published_at: published_at.map(str::to_string),
    }
}

// ═══════════════════════════════════════════════════════════
// Settings (key-value)
// ═══════════════════════════════════════════════════════════

#[test]
fn settings_set_and_get() {
    let pool = test_pool();
    Setting::set(&pool, "test_key", "hello").unwrap();
    assert_eq!(Setting::get(&pool, "test_key"), Some("hello".to_string()));
}

#[test]
fn settings_get_or_default() {
    let pool = test_pool();
    assert_eq!(Setting::get_or(&pool, "nonexistent", "fallback"), "fallback");
    Setting::set(&pool, "exists", "val").unwrap();
    assert_eq!(Setting::get_or(&pool, "exists", "fallback"), "val");
}

#[test]
fn settings_upsert() {
    let pool = test_pool();
    Setting::set(&pool, "key", "first").unwrap();
    Setting::set(&pool, "key", "second").unwrap();
    assert_eq!(Setting::get(&pool, "key"), Some("second".to_string()));
}

#[test]
fn settings_set_many() {
    let pool = test_pool();
    let mut map = HashMap::new();
    map.insert("k1".to_string(), "v1".to_string());
    map.insert("k2".to_string(), "v2".to_string());
    Setting::set_many(&pool, &map).unwrap();
    assert_eq!(Setting::get(&pool, "k1"), Some("v1".to_string()));
    assert_eq!(Setting::get(&pool, "k2"), Some("v2".to_string()));
}

#[test]
fn site_setting_upsert_and_all() {
    let pool = test_pool();
    SiteSetting::set(&pool, "home", "{}").unwrap();
    SiteSetting::set(&pool, "home", "{\"hero_title\":\"X\"}").unwrap();
    assert_eq!(
        SiteSetting::get(&pool, "home"),
        Some("{\"hero_title\":\"X\"}".to_string())
    );
    assert_eq!(SiteSetting::all(&pool).len(), 1);
}

// ═══════════════════════════════════════════════════════════
// Site settings bundle: merge + builders
// ═══════════════════════════════════════════════════════════

#[test]
fn site_settings_defaults_when_nothing_stored() {
    let pool = test_pool();
    let settings = site::get_site_settings(&pool);
    assert_eq!(settings, site::default_site_settings());
}

#[test]
fn site_settings_merge_keeps_untouched_defaults() {
    let pool = test_pool();
    SiteSetting::set(&pool, "home", "{\"hero_title\":\"X\"}").unwrap();

    let settings = site::get_site_settings(&pool);
    let defaults = site::default_site_settings();

    assert_eq!(settings.home.hero_title, "X");
    assert_eq!(settings.home.hero_description, defaults.home.hero_description);
    assert_eq!(settings.home.terminal_commands, defaults.home.terminal_commands);
    assert_eq!(settings.home.buttons, defaults.home.buttons);
}

#[test]
fn site_settings_malformed_json_falls_back_to_defaults() {
    let pool = test_pool();
    SiteSetting::set(&pool, "footer", "{not json").unwrap();
    let settings = site::get_site_settings(&pool);
    assert_eq!(settings.footer, site::default_site_settings().footer);
}

#[test]
fn site_settings_empty_stored_array_keeps_default_list() {
    let pool = test_pool();
    SiteSetting::set(&pool, "home", "{\"terminal_commands\":[]}").unwrap();
    let settings = site::get_site_settings(&pool);
    assert_eq!(
        settings.home.terminal_commands,
        site::default_site_settings().home.terminal_commands
    );
}

#[test]
fn site_settings_nested_seo_page_merge() {
    let pool = test_pool();
    SiteSetting::set(
        &pool,
        "seo",
        "{\"blog\":{\"meta_title\":\"My Blog\"}}",
    )
    .unwrap();
    let settings = site::get_site_settings(&pool);
    let defaults = site::default_site_settings();
    assert_eq!(settings.seo.blog.meta_title, "My Blog");
    assert_eq!(settings.seo.blog.og_image, defaults.seo.blog.og_image);
    assert_eq!(settings.seo.home, defaults.seo.home);
}

#[test]
fn link_line_parser_drops_malformed_lines() {
    let links = site::parse_link_lines("A|http://a\nmissing-pipe-line\nB|http://b", &[]);
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].label, "A");
    assert_eq!(links[0].url, "http://a");
    assert_eq!(links[1].label, "B");
    assert_eq!(links[1].url, "http://b");
}

#[test]
fn link_line_parser_keeps_pipes_inside_url() {
    let links = site::parse_link_lines("Docs|http://a/?q=x|y", &[]);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, "http://a/?q=x|y");
}

#[test]
fn link_line_parser_falls_back_on_empty_result() {
    let fallback = vec![site::Link {
        label: "Home".to_string(),
        url: "/".to_string(),
    }];
    let links = site::parse_link_lines("no pipes here\n\n", &fallback);
    assert_eq!(links, fallback);
}

#[test]
fn command_line_parser_trims_and_falls_back() {
    let parsed = site::parse_command_lines("  uptime  \n\n df -h ", &[]);
    assert_eq!(parsed, vec!["uptime".to_string(), "df -h".to_string()]);

    let fallback = vec!["whoami".to_string()];
    assert_eq!(site::parse_command_lines("   \n  ", &fallback), fallback);
}

#[test]
fn home_payload_keeps_previous_on_empty_fields() {
    let current = site::default_site_settings().home;
    let mut form = HashMap::new();
    form.insert("hero_title".to_string(), "  New Title  ".to_string());
    form.insert("hero_description".to_string(), "   ".to_string());

    let payload = site::build_home_payload(&form, &current);
    assert_eq!(payload.hero_title, "New Title");
    assert_eq!(payload.hero_description, current.hero_description);
    assert_eq!(payload.buttons, current.buttons);
}

#[test]
fn footer_payload_validates_copyright_year() {
    let current = site::default_site_settings().footer;

    let mut form = HashMap::new();
    form.insert("copyright_year".to_string(), "2030".to_string());
    assert_eq!(site::build_footer_payload(&form, &current).copyright_year, 2030);

    for bad in ["1990", "2101", "next year", ""] {
        let mut form = HashMap::new();
        form.insert("copyright_year".to_string(), bad.to_string());
        assert_eq!(
            site::build_footer_payload(&form, &current).copyright_year,
            current.copyright_year,
        );
    }
}

#[test]
fn navigation_payload_checkbox_and_links() {
    let current = site::default_site_settings().navigation;

    let mut form = HashMap::new();
    form.insert("links".to_string(), "Blog|/blog".to_string());
    form.insert("show_theme_toggle".to_string(), "on".to_string());
    let payload = site::build_navigation_payload(&form, &current);
    assert!(payload.show_theme_toggle);
    assert_eq!(payload.links.len(), 1);

    // Unchecked checkboxes are simply absent from the form
    let form: HashMap<String, String> = HashMap::new();
    assert!(!site::build_navigation_payload(&form, &current).show_theme_toggle);
}

#[test]
fn contact_payload_keeps_localized_pairs() {
    let current = site::default_site_settings().contact;
    let mut form = HashMap::new();
    form.insert("title_en".to_string(), "Say hello".to_string());

    let payload = site::build_contact_payload(&form, &current);
    assert_eq!(payload.title_en, "Say hello");
    assert_eq!(payload.title_ru, current.title_ru);
    assert_eq!(payload.success_message_en, current.success_message_en);
}

#[test]
fn seo_payload_updates_only_named_pages() {
    let current = site::default_site_settings().seo;
    let mut form = HashMap::new();
    form.insert("blog_meta_title".to_string(), "Notes".to_string());

    let payload = site::build_seo_payload(&form, &current);
    assert_eq!(payload.blog.meta_title, "Notes");
    assert_eq!(payload.home, current.home);
    assert_eq!(payload.blog.meta_description, current.blog.meta_description);
}

// ═══════════════════════════════════════════════════════════
// Publication resolver
// ═══════════════════════════════════════════════════════════

#[test]
fn resolve_scheduled_future_stays_scheduled() {
    let now = now();
    let future = now + chrono::Duration::hours(1);
    let requested = future.format("%Y-%m-%dT%H:%M").to_string();

    let result = publish::resolve_publication("scheduled", Some(&requested), None, now).unwrap();
    assert_eq!(result.status, PostStatus::Scheduled);
    let at = result.published_at.unwrap();
    assert!(at > now);
    assert_eq!(at.format("%Y-%m-%dT%H:%M").to_string(), requested);
}

#[test]
fn resolve_scheduled_past_collapses_to_published() {
    let now = now();
    let past = (now - chrono::Duration::hours(1))
        .format("%Y-%m-%dT%H:%M")
        .to_string();

    let result = publish::resolve_publication("scheduled", Some(&past), None, now).unwrap();
    assert_eq!(result.status, PostStatus::Published);
    assert_eq!(result.published_at, Some(now));
}

#[test]
fn resolve_scheduled_without_date_errors() {
    let result = publish::resolve_publication("scheduled", None, None, now());
    assert_eq!(
        result.unwrap_err(),
        "Scheduled posts require a publish date"
    );
}

#[test]
fn resolve_scheduled_unparseable_date_errors() {
    let result = publish::resolve_publication("scheduled", Some("not a date"), None, now());
    assert!(result.is_err());
}

#[test]
fn resolve_draft_always_clears_date() {
    let existing = now() - chrono::Duration::days(365);
    let result =
        publish::resolve_publication("draft", Some("2030-01-01"), Some(existing), now()).unwrap();
    assert_eq!(result.status, PostStatus::Draft);
    assert_eq!(result.published_at, None);
}

#[test]
fn resolve_published_fallback_chain() {
    let now = now();
    let existing = now - chrono::Duration::days(2);

    // Requested date wins
    let result =
        publish::resolve_publication("published", Some("2024-05-01"), Some(existing), now).unwrap();
    assert_eq!(
        result.published_at.unwrap().format("%Y-%m-%d").to_string(),
        "2024-05-01"
    );

    // Unparseable requested date falls through to the existing date
    let result =
        publish::resolve_publication("published", Some("garbage"), Some(existing), now).unwrap();
    assert_eq!(result.published_at, Some(existing));

    // No date at all falls through to now
    let result = publish::resolve_publication("published", None, None, now).unwrap();
    assert_eq!(result.published_at, Some(now));
}

#[test]
fn resolve_unknown_status_defaults_to_draft() {
    let result = publish::resolve_publication("archived", None, None, now()).unwrap();
    assert_eq!(result.status, PostStatus::Draft);
    assert_eq!(result.published_at, None);
}

#[test]
fn due_scheduled_sweep_publishes_elapsed_posts() {
    let pool = test_pool();
    let past = now() - chrono::Duration::minutes(5);
    let future = now() + chrono::Duration::hours(5);

    {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO posts (title, slug, content, status, published_at)
             VALUES ('Due', 'due', '', 'scheduled', ?1)",
            rusqlite::params![past],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO posts (title, slug, content, status, published_at)
             VALUES ('Later', 'later', '', 'scheduled', ?1)",
            rusqlite::params![future],
        )
        .unwrap();
    }

    let updated = publish::publish_due_scheduled(&pool).unwrap();
    assert_eq!(updated, 1);
    assert_eq!(Post::find_by_slug(&pool, "due").unwrap().status, "published");
    assert_eq!(Post::find_by_slug(&pool, "later").unwrap().status, "scheduled");
}

// ═══════════════════════════════════════════════════════════
// Posts
// ═══════════════════════════════════════════════════════════

#[test]
fn post_crud_and_slug_generation() {
    let pool = test_pool();

    let id = Post::create(&pool, &make_post_form("Hello World Post", "draft", None)).unwrap();
    let post = Post::find_by_id(&pool, id).unwrap();
    assert_eq!(post.slug, "hello-world-post");
    assert_eq!(post.status, "draft");
    assert_eq!(post.published_at, None);

    let mut form = make_post_form("Hello World Post", "published", None);
    form.slug = Some("hello-world-post".to_string());
    Post::update(&pool, id, &form).unwrap();
    let post = Post::find_by_id(&pool, id).unwrap();
    assert_eq!(post.status, "published");
    assert!(post.published_at.is_some());

    Post::delete(&pool, id).unwrap();
    assert!(Post::find_by_id(&pool, id).is_none());
}

#[test]
fn post_create_scheduled_without_date_is_rejected() {
    let pool = test_pool();
    let err = Post::create(&pool, &make_post_form("Later", "scheduled", None)).unwrap_err();
    assert_eq!(err, "Scheduled posts require a publish date");
    assert_eq!(Post::count(&pool, None), 0);
}

#[test]
fn published_listing_excludes_drafts() {
    let pool = test_pool();
    Post::create(&pool, &make_post_form("Draft", "draft", None)).unwrap();
    Post::create(&pool, &make_post_form("Live", "published", None)).unwrap();

    let listed = Post::published(&pool);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Live");
    assert!(Post::find_published_by_slug(&pool, "draft").is_none());
}

// ═══════════════════════════════════════════════════════════
// Other entities
// ═══════════════════════════════════════════════════════════

#[test]
fn about_is_seeded_on_first_read() {
    let pool = test_pool();
    let about = About::get_or_seed(&pool).unwrap();
    assert!(!about.title.is_empty());
    // Second read returns the same row
    assert_eq!(About::get_or_seed(&pool).unwrap().id, about.id);
}

#[test]
fn project_crud() {
    let pool = test_pool();
    let form = ProjectForm {
        title: "Network Monitor".to_string(),
        description: "Zabbix deployment".to_string(),
        technologies: "Zabbix, Linux".to_string(),
        image: None,
        github_link: Some("https://github.com/komron/netmon".to_string()),
        live_link: None,
    };
    let id = Project::create(&pool, &form).unwrap();
    assert_eq!(Project::count(&pool), 1);

    let mut updated = ProjectForm {
        title: "Network Monitor v2".to_string(),
        ..form
    };
    updated.live_link = Some("https://example.com".to_string());
    Project::update(&pool, id, &updated).unwrap();
    assert_eq!(Project::find_by_id(&pool, id).unwrap().title, "Network Monitor v2");

    Project::delete(&pool, id).unwrap();
    assert_eq!(Project::count(&pool), 0);
}

#[test]
fn task_ordering_and_status() {
    let pool = test_pool();
    let low = Task::create(
        &pool,
        &TaskForm {
            title: "Low".to_string(),
            description: None,
            priority: Some("low".to_string()),
            due_date: None,
        },
    )
    .unwrap();
    let high = Task::create(
        &pool,
        &TaskForm {
            title: "High".to_string(),
            description: None,
            priority: Some("high".to_string()),
            due_date: Some("2030-01-01".to_string()),
        },
    )
    .unwrap();

    let tasks = Task::list(&pool);
    assert_eq!(tasks[0].id, high);
    assert_eq!(tasks[1].id, low);

    Task::set_status(&pool, high, "done").unwrap();
    let tasks = Task::list(&pool);
    // Done tasks sink below open ones
    assert_eq!(tasks[0].id, low);
    assert_eq!(tasks[1].status, "done");
}

#[test]
fn contact_messages_lifecycle() {
    let pool = test_pool();
    let id = ContactMessage::create(&pool, "Alice", "a@example.com", "Hi there").unwrap();
    assert_eq!(ContactMessage::unread_count(&pool), 1);

    ContactMessage::mark_read(&pool, id).unwrap();
    assert_eq!(ContactMessage::unread_count(&pool), 0);

    ContactMessage::delete(&pool, id).unwrap();
    assert!(ContactMessage::list(&pool).is_empty());
}

#[test]
fn audit_log_write_list_and_filter() {
    let pool = test_pool();
    AuditEntry::log(&pool, "Admin", "create", Some("post"), Some(1), None, None);
    AuditEntry::log(&pool, "Admin", "delete", Some("post"), Some(1), None, None);
    AuditEntry::log(&pool, "Admin", "create", Some("project"), Some(2), None, None);

    assert_eq!(AuditEntry::count(&pool, None, None), 3);
    assert_eq!(AuditEntry::count(&pool, Some("create"), None), 2);
    assert_eq!(AuditEntry::count(&pool, Some("create"), Some("post")), 1);

    let entries = AuditEntry::list(&pool, None, Some("project"), 50, 0);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "create");
}

// ═══════════════════════════════════════════════════════════
// Auth / sessions
// ═══════════════════════════════════════════════════════════

#[test]
fn password_hash_and_verify() {
    let hash = bcrypt::hash("hunter2", 4).unwrap();
    assert!(auth::verify_password("hunter2", &hash));
    assert!(!auth::verify_password("wrong", &hash));
}

#[test]
fn session_create_validate_destroy() {
    let pool = test_pool();
    let id = auth::create_session(&pool, Some("127.0.0.1"), None).unwrap();
    assert!(auth::validate_session(&pool, &id));

    auth::destroy_session(&pool, &id);
    assert!(!auth::validate_session(&pool, &id));
}

#[test]
fn expired_sessions_are_rejected_and_cleaned() {
    let pool = test_pool();
    let id = auth::create_session(&pool, None, None).unwrap();

    {
        let conn = pool.get().unwrap();
        let past = now() - chrono::Duration::hours(1);
        conn.execute(
            "UPDATE sessions SET expires_at = ?1 WHERE id = ?2",
            rusqlite::params![past, id],
        )
        .unwrap();
    }

    assert!(!auth::validate_session(&pool, &id));
    assert_eq!(auth::cleanup_expired_sessions(&pool).unwrap(), 1);
}

// ═══════════════════════════════════════════════════════════
// Backup builder / applier
// ═══════════════════════════════════════════════════════════

fn seed_content(pool: &DbPool) {
    About::get_or_seed(pool).unwrap();
    Project::create(
        pool,
        &ProjectForm {
            title: "Proj".to_string(),
            description: "Desc".to_string(),
            technologies: "Rust".to_string(),
            image: None,
            github_link: None,
            live_link: None,
        },
    )
    .unwrap();
    Post::create(pool, &make_post_form("First Post", "published", None)).unwrap();
    Task::create(
        pool,
        &TaskForm {
            title: "Renew certs".to_string(),
            description: None,
            priority: None,
            due_date: None,
        },
    )
    .unwrap();
    Media::create(pool, "media_x.webp", "photo.jpg", "/uploads/media_x.webp").unwrap();
    SiteSetting::set(pool, "home", "{\"hero_title\":\"X\"}").unwrap();
}

#[test]
fn backup_payload_has_envelope_and_tables() {
    let pool = test_pool();
    seed_content(&pool);

    let doc = backup::build_backup_payload(&pool).unwrap();
    assert_eq!(doc["format"], backup::BACKUP_FORMAT);
    assert_eq!(doc["version"], backup::BACKUP_VERSION);
    assert!(doc["generated_at"].is_string());

    let data = doc["data"].as_object().unwrap();
    for table in [
        "about",
        "projects",
        "certificates",
        "posts",
        "tasks",
        "media",
        "site_settings",
    ] {
        assert!(data[table].is_array(), "missing table {}", table);
    }
    assert_eq!(data["projects"].as_array().unwrap().len(), 1);
    assert_eq!(data["site_settings"][0]["key"], "home");
}

#[test]
fn backup_validation_rejects_malformed_documents() {
    assert!(backup::is_valid_backup_payload(&serde_json::json!({
        "format": backup::BACKUP_FORMAT,
        "data": {},
    })));

    for doc in [
        serde_json::json!({ "format": "other-tool", "data": {} }),
        serde_json::json!({ "data": {} }),
        serde_json::json!({ "format": backup::BACKUP_FORMAT }),
        serde_json::json!({ "format": backup::BACKUP_FORMAT, "data": [] }),
        serde_json::json!({ "format": backup::BACKUP_FORMAT, "data": null }),
        serde_json::json!("just a string"),
    ] {
        assert!(!backup::is_valid_backup_payload(&doc), "accepted: {}", doc);
    }
}

#[test]
fn backup_apply_rejects_invalid_without_mutating() {
    let pool = test_pool();
    seed_content(&pool);

    let err = backup::apply_backup_data(&pool, &serde_json::json!({ "format": "nope" }))
        .unwrap_err();
    assert_eq!(err, "Unsupported backup format");
    assert_eq!(Project::count(&pool), 1);
    assert_eq!(Post::count(&pool, None), 1);
}

#[test]
fn backup_roundtrip_is_idempotent_modulo_timestamp() {
    let pool = test_pool();
    seed_content(&pool);

    let first = backup::build_backup_payload(&pool).unwrap();
    backup::apply_backup_data(&pool, &first).unwrap();
    let second = backup::build_backup_payload(&pool).unwrap();

    assert_eq!(first["data"], second["data"]);
    assert_eq!(first["format"], second["format"]);
    assert_eq!(first["version"], second["version"]);
}

#[test]
fn backup_apply_missing_table_list_clears_table() {
    let pool = test_pool();
    seed_content(&pool);

    // Document with an empty data object clears everything
    let doc = serde_json::json!({
        "format": backup::BACKUP_FORMAT,
        "version": backup::BACKUP_VERSION,
        "data": {},
    });
    backup::apply_backup_data(&pool, &doc).unwrap();

    assert_eq!(Project::count(&pool), 0);
    assert_eq!(Post::count(&pool, None), 0);
    assert!(Task::list(&pool).is_empty());
    assert!(SiteSetting::all(&pool).is_empty());
}

#[test]
fn backup_apply_resets_identity() {
    let pool = test_pool();
    seed_content(&pool);

    let doc = serde_json::json!({
        "format": backup::BACKUP_FORMAT,
        "version": backup::BACKUP_VERSION,
        "data": {},
    });
    backup::apply_backup_data(&pool, &doc).unwrap();

    // Fresh inserts start over from id 1
    let id = Post::create(&pool, &make_post_form("Restart", "draft", None)).unwrap();
    assert_eq!(id, 1);
}

#[test]
fn backup_apply_is_atomic_on_row_failure() {
    let pool = test_pool();
    seed_content(&pool);

    // Two posts with the same slug violate the unique constraint mid-apply
    let doc = serde_json::json!({
        "format": backup::BACKUP_FORMAT,
        "version": backup::BACKUP_VERSION,
        "data": {
            "projects": [],
            "posts": [
                { "title": "A", "slug": "dup", "content": "", "status": "draft" },
                { "title": "B", "slug": "dup", "content": "", "status": "draft" },
            ],
        },
    });

    assert!(backup::apply_backup_data(&pool, &doc).is_err());

    // Every table is exactly as it was before the call
    assert_eq!(Project::count(&pool), 1);
    assert_eq!(Post::count(&pool, None), 1);
    assert_eq!(Post::published(&pool)[0].title, "First Post");
    assert_eq!(SiteSetting::all(&pool).len(), 1);
}

// ═══════════════════════════════════════════════════════════
// Backup package (ZIP)
// ═══════════════════════════════════════════════════════════

#[test]
fn package_roundtrip_restores_uploads_and_data() {
    let pool = test_pool();
    seed_content(&pool);

    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(uploads.join("nested")).unwrap();
    std::fs::write(uploads.join("a.webp"), b"img-a").unwrap();
    std::fs::write(uploads.join("nested/b.webp"), b"img-b").unwrap();

    let zip_path = dir.path().join("backup.zip");
    package::write_backup_package(
        &pool,
        &uploads,
        std::fs::File::create(&zip_path).unwrap(),
    )
    .unwrap();

    // Mutate state so the restore is observable
    Project::create(
        &pool,
        &ProjectForm {
            title: "Extra".to_string(),
            description: "d".to_string(),
            technologies: "t".to_string(),
            image: None,
            github_link: None,
            live_link: None,
        },
    )
    .unwrap();
    std::fs::write(uploads.join("stale.webp"), b"stale").unwrap();

    let report = package::extract_backup_package(&pool, &zip_path, &uploads).unwrap();
    report.apply_result.unwrap();
    assert_eq!(report.restored_files, 2);
    assert_eq!(report.skipped_entries, 0);

    assert_eq!(Project::count(&pool), 1);
    assert_eq!(std::fs::read(uploads.join("a.webp")).unwrap(), b"img-a");
    assert_eq!(std::fs::read(uploads.join("nested/b.webp")).unwrap(), b"img-b");
    assert!(!uploads.join("stale.webp").exists());
}

fn write_test_zip(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn minimal_backup_json() -> String {
    serde_json::json!({
        "format": backup::BACKUP_FORMAT,
        "version": backup::BACKUP_VERSION,
        "data": {},
    })
    .to_string()
}

#[test]
fn package_extract_skips_traversal_entries() {
    let pool = test_pool();

    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();

    let zip_path = dir.path().join("crafted.zip");
    write_test_zip(
        &zip_path,
        &[
            ("backup.json", minimal_backup_json().as_bytes()),
            ("uploads/ok.txt", b"fine"),
            ("uploads/../passthrough.txt", b"evil"),
            ("uploads/nested/../../escape.txt", b"evil"),
        ],
    );

    let report = package::extract_backup_package(&pool, &zip_path, &uploads).unwrap();
    report.apply_result.unwrap();
    assert_eq!(report.restored_files, 1);
    assert_eq!(report.skipped_entries, 2);

    assert!(uploads.join("ok.txt").exists());
    assert!(!dir.path().join("passthrough.txt").exists());
    assert!(!dir.path().join("escape.txt").exists());
    assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
}

#[test]
fn package_extract_requires_backup_json() {
    let pool = test_pool();

    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();

    let zip_path = dir.path().join("no-manifest.zip");
    write_test_zip(&zip_path, &[("uploads/a.txt", b"a")]);

    let err = package::extract_backup_package(&pool, &zip_path, &uploads).unwrap_err();
    assert_eq!(err, "No backup.json found in archive");
    // Nothing restored when the manifest is missing
    assert!(uploads.join("a.txt").exists() == false);
}

#[test]
fn package_extract_finds_backup_json_by_basename() {
    let pool = test_pool();
    seed_content(&pool);

    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();

    // Entry nested and capitalized still counts
    let zip_path = dir.path().join("nested-manifest.zip");
    write_test_zip(
        &zip_path,
        &[("export/Backup.JSON", minimal_backup_json().as_bytes())],
    );

    let report = package::extract_backup_package(&pool, &zip_path, &uploads).unwrap();
    report.apply_result.unwrap();
    assert_eq!(Post::count(&pool, None), 0);
}

#[test]
fn package_extract_reports_apply_failure_but_restores_uploads() {
    let pool = test_pool();
    seed_content(&pool);

    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();

    let zip_path = dir.path().join("bad-json.zip");
    write_test_zip(
        &zip_path,
        &[
            ("backup.json", b"{ not json" as &[u8]),
            ("uploads/kept.txt", b"kept"),
        ],
    );

    let report = package::extract_backup_package(&pool, &zip_path, &uploads).unwrap();
    assert!(report.apply_result.is_err());
    // Tables untouched, uploads still rebuilt from the archive
    assert_eq!(Post::count(&pool, None), 1);
    assert_eq!(report.restored_files, 1);
    assert!(uploads.join("kept.txt").exists());
}
