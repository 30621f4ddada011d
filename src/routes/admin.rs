use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::response::{Flash, Redirect};
use rocket::State;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::auth::{AdminUser, ClientIp};
use crate::db::DbPool;
use crate::images;
use crate::models::about::{About, AboutForm};
use crate::models::audit::AuditEntry;
use crate::models::certificate::{Certificate, CertificateForm};
use crate::models::media::Media;
use crate::models::message::ContactMessage;
use crate::models::post::{Post, PostForm};
use crate::models::project::{Project, ProjectForm};
use crate::models::settings::Setting;
use crate::models::task::{Task, TaskForm};
use crate::site;

pub(crate) fn admin_name(pool: &DbPool) -> String {
    Setting::get_or(pool, "admin_display_name", "Admin")
}

/// Persist an uploaded file into the uploads directory under a unique
/// name, then run the best-effort image optimizer over it. Returns the
/// stored filename, or None when the upload is rejected.
pub(crate) async fn save_upload(
    file: &mut TempFile<'_>,
    prefix: &str,
    pool: &DbPool,
) -> Option<String> {
    if !images::check_file_size(pool, file.len() as usize) {
        log::warn!("Upload rejected: file exceeds the configured size limit");
        return None;
    }

    let ext = file
        .content_type()
        .and_then(|ct| ct.extension())
        .map(|e| e.to_string())
        .or_else(|| {
            file.raw_name().and_then(|rn| {
                let s = rn.dangerous_unsafe_unsanitized_raw().as_str().to_string();
                s.rsplit('.').next().map(|e| e.to_lowercase())
            })
        })
        .unwrap_or_else(|| "jpg".to_string());

    if !images::is_allowed_type(pool, &ext) {
        log::warn!("Upload rejected: file type '{}' not allowed", ext);
        return None;
    }

    let filename = format!("{}_{}.{}", prefix, uuid::Uuid::new_v4(), ext);
    let uploads = Setting::get_or(pool, "uploads_path", "website/uploads/");
    let upload_dir = Path::new(&uploads);
    let _ = std::fs::create_dir_all(upload_dir);
    let dest = upload_dir.join(&filename);

    if file.persist_to(&dest).await.is_err() {
        return None;
    }

    let optimized = images::optimize_upload(&dest, &images::OptimizeOptions::from_settings(pool));
    optimized
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
}

// ── Dashboard ──────────────────────────────────────────

#[get("/")]
pub fn dashboard(_admin: AdminUser, pool: &State<DbPool>) -> Json<Value> {
    Json(json!({
        "projects": Project::count(pool),
        "certificates": Certificate::count(pool),
        "posts": Post::count(pool, None),
        "drafts": Post::count(pool, Some("draft")),
        "scheduled": Post::count(pool, Some("scheduled")),
        "unread_messages": ContactMessage::unread_count(pool),
    }))
}

// ── Site settings ──────────────────────────────────────

#[get("/settings")]
pub fn settings_page(_admin: AdminUser, pool: &State<DbPool>) -> Json<site::SiteSettings> {
    Json(site::get_site_settings(pool))
}

#[post("/settings/<section>", data = "<form>")]
pub fn settings_save(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    section: &str,
    form: Form<HashMap<String, String>>,
) -> Flash<Redirect> {
    let data = form.into_inner();
    let current = site::get_site_settings(pool);

    let result = match section {
        "home" => site::set_site_setting(pool, "home", &site::build_home_payload(&data, &current.home)),
        "footer" => {
            site::set_site_setting(pool, "footer", &site::build_footer_payload(&data, &current.footer))
        }
        "navigation" => site::set_site_setting(
            pool,
            "navigation",
            &site::build_navigation_payload(&data, &current.navigation),
        ),
        "contact" => site::set_site_setting(
            pool,
            "contact",
            &site::build_contact_payload(&data, &current.contact),
        ),
        "seo" => site::set_site_setting(pool, "seo", &site::build_seo_payload(&data, &current.seo)),
        other => {
            return Flash::error(
                Redirect::to("/admin/settings"),
                format!("Unknown settings section: {}", other),
            )
        }
    };

    match result {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "update",
                Some("site_settings"),
                None,
                Some(section),
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/settings"), "Settings saved.")
        }
        Err(e) => {
            log::error!("Failed to save {} settings: {}", section, e);
            Flash::error(Redirect::to("/admin/settings"), "Failed to save settings.")
        }
    }
}

// ── About ──────────────────────────────────────────────

#[get("/about")]
pub fn about_page(_admin: AdminUser, pool: &State<DbPool>) -> Json<Value> {
    match About::get_or_seed(pool) {
        Ok(about) => Json(json!({ "ok": true, "about": about })),
        Err(e) => Json(json!({ "ok": false, "error": e })),
    }
}

#[derive(FromForm)]
pub struct AboutFormData<'f> {
    pub title: String,
    pub content: String,
    pub skills: String,
    pub avatar: Option<TempFile<'f>>,
}

#[post("/about", data = "<form>")]
pub async fn about_save(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    mut form: Form<AboutFormData<'_>>,
) -> Flash<Redirect> {
    let avatar = match form.avatar.as_mut() {
        Some(f) if f.len() > 0 => save_upload(f, "avatar", pool)
            .await
            .map(|name| format!("/uploads/{}", name)),
        _ => None,
    };

    let about_form = AboutForm {
        title: form.title.clone(),
        content: form.content.clone(),
        skills: form.skills.clone(),
        avatar,
    };

    match About::update(pool, &about_form) {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "update",
                Some("about"),
                None,
                None,
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/about"), "About page saved.")
        }
        Err(e) => Flash::error(Redirect::to("/admin/about"), format!("Save failed: {}", e)),
    }
}

// ── Projects ───────────────────────────────────────────

#[get("/projects")]
pub fn projects_list(_admin: AdminUser, pool: &State<DbPool>) -> Json<Vec<Project>> {
    Json(Project::list(pool))
}

#[derive(FromForm)]
pub struct ProjectFormData {
    pub title: String,
    pub description: String,
    pub technologies: String,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
}

impl ProjectFormData {
    fn to_model(&self) -> ProjectForm {
        ProjectForm {
            title: self.title.clone(),
            description: self.description.clone(),
            technologies: self.technologies.clone(),
            image: None,
            github_link: self.github_link.clone().filter(|s| !s.trim().is_empty()),
            live_link: self.live_link.clone().filter(|s| !s.trim().is_empty()),
        }
    }
}

#[post("/projects", data = "<form>")]
pub fn projects_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    form: Form<ProjectFormData>,
) -> Flash<Redirect> {
    match Project::create(pool, &form.to_model()) {
        Ok(id) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "create",
                Some("project"),
                Some(id),
                Some(&form.title),
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/projects"), "Project created.")
        }
        Err(e) => Flash::error(Redirect::to("/admin/projects"), format!("Create failed: {}", e)),
    }
}

#[post("/projects/<id>", data = "<form>")]
pub fn projects_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    id: i64,
    form: Form<ProjectFormData>,
) -> Flash<Redirect> {
    match Project::update(pool, id, &form.to_model()) {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "update",
                Some("project"),
                Some(id),
                Some(&form.title),
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/projects"), "Project updated.")
        }
        Err(e) => Flash::error(Redirect::to("/admin/projects"), format!("Update failed: {}", e)),
    }
}

#[post("/projects/<id>/delete")]
pub fn projects_delete(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    id: i64,
) -> Flash<Redirect> {
    match Project::delete(pool, id) {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "delete",
                Some("project"),
                Some(id),
                None,
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/projects"), "Project deleted.")
        }
        Err(e) => Flash::error(Redirect::to("/admin/projects"), format!("Delete failed: {}", e)),
    }
}

// ── Certificates ───────────────────────────────────────

#[get("/certificates")]
pub fn certificates_list(_admin: AdminUser, pool: &State<DbPool>) -> Json<Vec<Certificate>> {
    Json(Certificate::list(pool))
}

#[derive(FromForm)]
pub struct CertificateFormData<'f> {
    pub title: String,
    pub description: Option<String>,
    pub issue_date: Option<String>,
    pub image: TempFile<'f>,
}

#[post("/certificates", data = "<form>")]
pub async fn certificates_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    mut form: Form<CertificateFormData<'_>>,
) -> Flash<Redirect> {
    let image = match save_upload(&mut form.image, "cert", pool).await {
        Some(name) => format!("/uploads/{}", name),
        None => {
            return Flash::error(
                Redirect::to("/admin/certificates"),
                "Certificate image upload was rejected.",
            )
        }
    };

    let cert_form = CertificateForm {
        title: form.title.clone(),
        description: form.description.clone(),
        image,
        issue_date: form.issue_date.clone(),
    };

    match Certificate::create(pool, &cert_form) {
        Ok(id) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "create",
                Some("certificate"),
                Some(id),
                Some(&form.title),
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/certificates"), "Certificate added.")
        }
        Err(e) => Flash::error(
            Redirect::to("/admin/certificates"),
            format!("Create failed: {}", e),
        ),
    }
}

#[post("/certificates/<id>/delete")]
pub fn certificates_delete(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    id: i64,
) -> Flash<Redirect> {
    match Certificate::delete(pool, id) {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "delete",
                Some("certificate"),
                Some(id),
                None,
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/certificates"), "Certificate deleted.")
        }
        Err(e) => Flash::error(
            Redirect::to("/admin/certificates"),
            format!("Delete failed: {}", e),
        ),
    }
}

// ── Posts ──────────────────────────────────────────────

#[get("/posts?<status>")]
pub fn posts_list(
    _admin: AdminUser,
    pool: &State<DbPool>,
    status: Option<String>,
) -> Json<Value> {
    Json(json!({
        "posts": Post::list(pool, status.as_deref()),
        "count_all": Post::count(pool, None),
        "count_published": Post::count(pool, Some("published")),
        "count_draft": Post::count(pool, Some("draft")),
        "count_scheduled": Post::count(pool, Some("scheduled")),
    }))
}

#[derive(FromForm)]
pub struct PostFormData<'f> {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: String,
    pub published_at: Option<String>,
    pub featured_image: Option<TempFile<'f>>,
}

async fn post_form_to_model(
    form: &mut Form<PostFormData<'_>>,
    pool: &DbPool,
    existing_image: Option<String>,
) -> PostForm {
    let featured = match form.featured_image.as_mut() {
        Some(f) if f.len() > 0 => save_upload(f, "post", pool)
            .await
            .map(|name| format!("/uploads/{}", name)),
        _ => None,
    };

    PostForm {
        title: form.title.clone(),
        slug: form.slug.clone(),
        content: form.content.clone(),
        excerpt: form.excerpt.clone().filter(|s| !s.trim().is_empty()),
        featured_image: featured.or(existing_image),
        status: form.status.clone(),
        published_at: form.published_at.clone(),
    }
}

#[post("/posts", data = "<form>")]
pub async fn posts_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    mut form: Form<PostFormData<'_>>,
) -> Flash<Redirect> {
    let post_form = post_form_to_model(&mut form, pool, None).await;

    match Post::create(pool, &post_form) {
        Ok(id) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "create",
                Some("post"),
                Some(id),
                Some(&form.title),
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/posts"), "Post saved.")
        }
        // Publication resolution errors (e.g. scheduled without a date)
        // surface to the editor as a validation failure
        Err(e) => Flash::error(Redirect::to("/admin/posts"), e),
    }
}

#[post("/posts/<id>", data = "<form>")]
pub async fn posts_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    id: i64,
    mut form: Form<PostFormData<'_>>,
) -> Flash<Redirect> {
    let existing_image = Post::find_by_id(pool, id).and_then(|p| p.featured_image);
    let post_form = post_form_to_model(&mut form, pool, existing_image).await;

    match Post::update(pool, id, &post_form) {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "update",
                Some("post"),
                Some(id),
                Some(&form.title),
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/posts"), "Post saved.")
        }
        Err(e) => Flash::error(Redirect::to("/admin/posts"), e),
    }
}

#[post("/posts/<id>/delete")]
pub fn posts_delete(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    id: i64,
) -> Flash<Redirect> {
    // Remove the featured image file with the row
    if let Some(post) = Post::find_by_id(pool, id) {
        if let Some(image) = post.featured_image.as_deref() {
            if let Some(name) = image.strip_prefix("/uploads/") {
                let uploads = Setting::get_or(pool, "uploads_path", "website/uploads/");
                let _ = std::fs::remove_file(Path::new(&uploads).join(name));
            }
        }
    }

    match Post::delete(pool, id) {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "delete",
                Some("post"),
                Some(id),
                None,
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/posts"), "Post deleted.")
        }
        Err(e) => Flash::error(Redirect::to("/admin/posts"), format!("Delete failed: {}", e)),
    }
}

// ── Tasks ──────────────────────────────────────────────

#[get("/tasks")]
pub fn tasks_list(_admin: AdminUser, pool: &State<DbPool>) -> Json<Vec<Task>> {
    Json(Task::list(pool))
}

#[derive(FromForm)]
pub struct TaskFormData {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl TaskFormData {
    fn to_model(&self) -> TaskForm {
        TaskForm {
            title: self.title.clone(),
            description: self.description.clone().filter(|s| !s.trim().is_empty()),
            priority: self.priority.clone(),
            due_date: self.due_date.clone(),
        }
    }
}

#[post("/tasks", data = "<form>")]
pub fn tasks_create(
    _admin: AdminUser,
    pool: &State<DbPool>,
    form: Form<TaskFormData>,
) -> Flash<Redirect> {
    match Task::create(pool, &form.to_model()) {
        Ok(_) => Flash::success(Redirect::to("/admin/tasks"), "Task added."),
        Err(e) => Flash::error(Redirect::to("/admin/tasks"), format!("Create failed: {}", e)),
    }
}

#[post("/tasks/<id>", data = "<form>")]
pub fn tasks_update(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
    form: Form<TaskFormData>,
) -> Flash<Redirect> {
    match Task::update(pool, id, &form.to_model()) {
        Ok(()) => Flash::success(Redirect::to("/admin/tasks"), "Task updated."),
        Err(e) => Flash::error(Redirect::to("/admin/tasks"), format!("Update failed: {}", e)),
    }
}

#[post("/tasks/<id>/status", data = "<form>")]
pub fn tasks_set_status(
    _admin: AdminUser,
    pool: &State<DbPool>,
    id: i64,
    form: Form<HashMap<String, String>>,
) -> Flash<Redirect> {
    let status = form.get("status").map(String::as_str).unwrap_or("open");
    match Task::set_status(pool, id, status) {
        Ok(()) => Flash::success(Redirect::to("/admin/tasks"), "Task updated."),
        Err(e) => Flash::error(Redirect::to("/admin/tasks"), format!("Update failed: {}", e)),
    }
}

#[post("/tasks/<id>/delete")]
pub fn tasks_delete(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> Flash<Redirect> {
    match Task::delete(pool, id) {
        Ok(()) => Flash::success(Redirect::to("/admin/tasks"), "Task deleted."),
        Err(e) => Flash::error(Redirect::to("/admin/tasks"), format!("Delete failed: {}", e)),
    }
}

// ── Media ──────────────────────────────────────────────

#[get("/media")]
pub fn media_list(_admin: AdminUser, pool: &State<DbPool>) -> Json<Vec<Media>> {
    Json(Media::list(pool))
}

#[derive(FromForm)]
pub struct MediaUpload<'f> {
    pub file: TempFile<'f>,
}

#[post("/media/upload", data = "<form>")]
pub async fn media_upload(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    mut form: Form<MediaUpload<'_>>,
) -> Json<Value> {
    let original_name = form
        .file
        .raw_name()
        .map(|rn| rn.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .unwrap_or_else(|| "upload".to_string());

    let filename = match save_upload(&mut form.file, "media", pool).await {
        Some(name) => name,
        None => return Json(json!({ "ok": false, "error": "Upload rejected" })),
    };

    let url = format!("/uploads/{}", filename);
    match Media::create(pool, &filename, &original_name, &url) {
        Ok(id) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "upload",
                Some("media"),
                Some(id),
                Some(&original_name),
                Some(&client_ip.0),
            );
            Json(json!({ "ok": true, "id": id, "url": url }))
        }
        Err(e) => Json(json!({ "ok": false, "error": e })),
    }
}

#[post("/media/<id>/delete")]
pub fn media_delete(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    id: i64,
) -> Flash<Redirect> {
    match Media::delete(pool, id) {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "delete",
                Some("media"),
                Some(id),
                None,
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/media"), "File deleted.")
        }
        Err(e) => Flash::error(Redirect::to("/admin/media"), format!("Delete failed: {}", e)),
    }
}

// ── Messages ───────────────────────────────────────────

#[get("/messages")]
pub fn messages_list(_admin: AdminUser, pool: &State<DbPool>) -> Json<Vec<ContactMessage>> {
    Json(ContactMessage::list(pool))
}

#[post("/messages/<id>/read")]
pub fn messages_mark_read(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> Flash<Redirect> {
    match ContactMessage::mark_read(pool, id) {
        Ok(()) => Flash::success(Redirect::to("/admin/messages"), "Marked as read."),
        Err(e) => Flash::error(Redirect::to("/admin/messages"), format!("Update failed: {}", e)),
    }
}

#[post("/messages/<id>/delete")]
pub fn messages_delete(_admin: AdminUser, pool: &State<DbPool>, id: i64) -> Flash<Redirect> {
    match ContactMessage::delete(pool, id) {
        Ok(()) => Flash::success(Redirect::to("/admin/messages"), "Message deleted."),
        Err(e) => Flash::error(Redirect::to("/admin/messages"), format!("Delete failed: {}", e)),
    }
}

// ── Audit log ──────────────────────────────────────────

#[get("/audit?<action>&<entity>&<page>")]
pub fn audit_list(
    _admin: AdminUser,
    pool: &State<DbPool>,
    action: Option<String>,
    entity: Option<String>,
    page: Option<i64>,
) -> Json<Value> {
    let per_page = 50i64;
    let current_page = page.unwrap_or(1).max(1);
    let offset = (current_page - 1) * per_page;

    let entries = AuditEntry::list(pool, action.as_deref(), entity.as_deref(), per_page, offset);
    let total = AuditEntry::count(pool, action.as_deref(), entity.as_deref());

    Json(json!({
        "entries": entries,
        "total": total,
        "page": current_page,
        "total_pages": (total as f64 / per_page as f64).ceil() as i64,
    }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        dashboard,
        settings_page,
        settings_save,
        about_page,
        about_save,
        projects_list,
        projects_create,
        projects_update,
        projects_delete,
        certificates_list,
        certificates_create,
        certificates_delete,
        posts_list,
        posts_create,
        posts_update,
        posts_delete,
        tasks_list,
        tasks_create,
        tasks_update,
        tasks_set_status,
        tasks_delete,
        media_list,
        media_upload,
        media_delete,
        messages_list,
        messages_mark_read,
        messages_delete,
        audit_list,
    ]
}
