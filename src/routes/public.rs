use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::DbPool;
use crate::models::about::About;
use crate::models::certificate::Certificate;
use crate::models::message::ContactMessage;
use crate::models::post::Post;
use crate::models::project::Project;
use crate::publish;
use crate::site;

// ── Site settings bundle ───────────────────────────────

#[get("/site")]
pub fn site_settings(pool: &State<DbPool>) -> Json<site::SiteSettings> {
    Json(site::get_site_settings(pool))
}

// ── Content ────────────────────────────────────────────

#[get("/about")]
pub fn about(pool: &State<DbPool>) -> Json<Value> {
    match About::get_or_seed(pool) {
        Ok(about) => Json(json!({ "ok": true, "about": about })),
        Err(e) => Json(json!({ "ok": false, "error": e })),
    }
}

#[get("/projects")]
pub fn projects(pool: &State<DbPool>) -> Json<Vec<Project>> {
    Json(Project::list(pool))
}

#[get("/certificates")]
pub fn certificates(pool: &State<DbPool>) -> Json<Vec<Certificate>> {
    Json(Certificate::list(pool))
}

// ── Blog ───────────────────────────────────────────────

#[get("/posts")]
pub fn posts(pool: &State<DbPool>) -> Json<Vec<Post>> {
    // Flip any due scheduled post before the listing read
    if let Err(e) = publish::publish_due_scheduled(pool) {
        log::warn!("Scheduled publish sweep failed: {}", e);
    }
    Json(Post::published(pool))
}

#[get("/posts/<slug>")]
pub fn post_by_slug(pool: &State<DbPool>, slug: &str) -> Option<Json<Post>> {
    if let Err(e) = publish::publish_due_scheduled(pool) {
        log::warn!("Scheduled publish sweep failed: {}", e);
    }
    Post::find_published_by_slug(pool, slug).map(Json)
}

// ── Contact form ───────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[post("/contact", format = "json", data = "<body>")]
pub fn contact(pool: &State<DbPool>, body: Json<ContactForm>) -> Json<Value> {
    let name = body.name.trim();
    let email = body.email.trim();
    let message = body.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Json(json!({ "ok": false, "error": "All fields are required" }));
    }

    match ContactMessage::create(pool, name, email, message) {
        Ok(_) => {
            let settings = site::get_site_settings(pool);
            Json(json!({ "ok": true, "message": settings.contact.success_message_en }))
        }
        Err(e) => {
            log::error!("Failed to store contact message: {}", e);
            Json(json!({ "ok": false, "error": "Failed to send message" }))
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        site_settings,
        about,
        projects,
        certificates,
        posts,
        post_by_slug,
        contact,
    ]
}
