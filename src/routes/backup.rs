use rocket::data::{Data, ToByteUnit};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::{ContentType, Header};
use rocket::response::{self, Flash, Redirect, Responder};
use rocket::{Request, State};
use std::fs::File;
use std::path::Path;

use crate::auth::{AdminUser, ClientIp};
use crate::db::DbPool;
use crate::models::audit::AuditEntry;
use crate::models::settings::Setting;
use crate::backup;
use crate::package;
use crate::routes::admin::admin_name;

fn uploads_root(pool: &DbPool) -> String {
    let path = Setting::get_or(pool, "uploads_path", "website/uploads/");
    path.trim_end_matches('/').to_string()
}

/// Wrapper that serves a body as a named file download
pub struct Download<B> {
    body: B,
    content_type: ContentType,
    filename: String,
}

impl<'r, B: Responder<'r, 'static>> Responder<'r, 'static> for Download<B> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut resp = self.body.respond_to(req)?;
        resp.set_header(self.content_type);
        resp.set_header(Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", self.filename),
        ));
        Ok(resp)
    }
}

// ── Export ─────────────────────────────────────────────

#[get("/backup/export.json")]
pub fn export_json(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
) -> Result<Download<String>, Flash<Redirect>> {
    let payload = backup::build_backup_payload(pool).map_err(|e| {
        log::error!("Backup export failed: {}", e);
        Flash::error(Redirect::to("/admin/settings"), "Backup export failed.")
    })?;

    let body = serde_json::to_string_pretty(&payload)
        .map_err(|e| Flash::error(Redirect::to("/admin/settings"), e.to_string()))?;

    AuditEntry::log(
        pool,
        &admin_name(pool),
        "export",
        Some("backup"),
        None,
        Some("json"),
        Some(&client_ip.0),
    );

    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    Ok(Download {
        body,
        content_type: ContentType::JSON,
        filename: format!("sysfolio-backup-{}.json", stamp),
    })
}

#[get("/backup/export.zip")]
pub async fn export_zip(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
) -> Result<Download<rocket::tokio::fs::File>, Flash<Redirect>> {
    let err = |msg: String| {
        log::error!("Backup package export failed: {}", msg);
        Flash::error(Redirect::to("/admin/settings"), "Backup export failed.")
    };

    let tmp = std::env::temp_dir().join(format!("sysfolio-export-{}.zip", uuid::Uuid::new_v4()));
    let writer = File::create(&tmp).map_err(|e| err(e.to_string()))?;

    let root = uploads_root(pool);
    if let Err(e) = package::write_backup_package(pool, Path::new(&root), writer) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err(e));
    }

    let file = rocket::tokio::fs::File::open(&tmp)
        .await
        .map_err(|e| err(e.to_string()))?;
    // The open handle keeps the data streamable after the unlink
    let _ = std::fs::remove_file(&tmp);

    AuditEntry::log(
        pool,
        &admin_name(pool),
        "export",
        Some("backup"),
        None,
        Some("zip"),
        Some(&client_ip.0),
    );

    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    Ok(Download {
        body: file,
        content_type: ContentType::ZIP,
        filename: format!("sysfolio-backup-{}.zip", stamp),
    })
}

// ── Import ─────────────────────────────────────────────

#[post("/backup/import/json", data = "<data>")]
pub async fn import_json(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    data: Data<'_>,
) -> Flash<Redirect> {
    let bytes = match data.open(100.mebibytes()).into_bytes().await {
        Ok(b) if b.is_complete() => b.into_inner(),
        _ => {
            return Flash::error(
                Redirect::to("/admin/settings"),
                "Failed to read upload data.",
            )
        }
    };

    let doc: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => {
            return Flash::error(
                Redirect::to("/admin/settings"),
                format!("Invalid JSON: {}", e),
            )
        }
    };

    match backup::apply_backup_data(pool, &doc) {
        Ok(()) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "import",
                Some("backup"),
                None,
                Some("json"),
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin/settings"), "Backup restored.")
        }
        Err(e) => Flash::error(Redirect::to("/admin/settings"), e),
    }
}

#[derive(FromForm)]
pub struct BackupUpload<'f> {
    pub archive: TempFile<'f>,
}

#[post("/backup/import/zip", data = "<form>")]
pub async fn import_zip(
    _admin: AdminUser,
    pool: &State<DbPool>,
    client_ip: ClientIp,
    mut form: Form<BackupUpload<'_>>,
) -> Flash<Redirect> {
    let staging =
        std::env::temp_dir().join(format!("sysfolio-import-{}.zip", uuid::Uuid::new_v4()));

    if form.archive.persist_to(&staging).await.is_err() {
        let _ = std::fs::remove_file(&staging);
        return Flash::error(
            Redirect::to("/admin/settings"),
            "Failed to stage the uploaded archive.",
        );
    }

    let root = uploads_root(pool);
    let result = package::extract_backup_package(pool, &staging, Path::new(&root));

    // The staged archive is always removed, whatever the outcome
    let _ = std::fs::remove_file(&staging);

    match result {
        Ok(report) => {
            AuditEntry::log(
                pool,
                &admin_name(pool),
                "import",
                Some("backup"),
                None,
                Some(&format!(
                    "zip: {} files restored, {} skipped",
                    report.restored_files, report.skipped_entries
                )),
                Some(&client_ip.0),
            );

            match report.apply_result {
                Ok(()) => Flash::success(
                    Redirect::to("/admin/settings"),
                    format!(
                        "Backup restored: {} upload file(s), {} entr(ies) skipped.",
                        report.restored_files, report.skipped_entries
                    ),
                ),
                Err(e) => Flash::error(
                    Redirect::to("/admin/settings"),
                    format!(
                        "Uploads restored ({} files), but applying backup.json failed: {}",
                        report.restored_files, e
                    ),
                ),
            }
        }
        Err(e) => Flash::error(Redirect::to("/admin/settings"), e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![export_json, export_zip, import_json, import_zip]
}
