#[macro_use]
extern crate rocket;

use rocket::fs::FileServer;
use rocket::response::content::RawHtml;

mod auth;
mod backup;
mod boot;
mod db;
mod images;
mod models;
mod package;
mod publish;
mod routes;
mod site;

#[cfg(test)]
mod tests;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check — verify/create directories before anything touches them
    boot::run();

    let pool = db::init_pool().expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");
    db::seed_defaults(&pool).expect("Failed to seed default settings");

    // Opportunistic housekeeping at startup; there is no background scheduler
    if let Ok(removed) = auth::cleanup_expired_sessions(&pool) {
        if removed > 0 {
            log::info!("Removed {} expired session(s)", removed);
        }
    }
    let audit_max_age = models::settings::Setting::get_i64(&pool, "audit_log_max_age_days").max(1);
    if let Ok(removed) = models::audit::AuditEntry::cleanup(&pool, audit_max_age) {
        if removed > 0 {
            log::info!("Pruned {} old audit log entr(ies)", removed);
        }
    }

    rocket::build()
        .manage(pool)
        .mount("/uploads", FileServer::from("website/uploads"))
        .mount("/api", routes::public::routes())
        .mount("/admin", routes::auth::routes())
        .mount("/admin", routes::admin::routes())
        .mount("/admin", routes::backup::routes())
        .register("/", catchers![not_found, server_error])
}
