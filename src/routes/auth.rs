use rocket::form::Form;
use rocket::http::{Cookie, CookieJar};
use rocket::response::{Flash, Redirect};
use rocket::State;

use crate::auth::{self, AdminUser, ClientIp, SESSION_COOKIE};
use crate::db::DbPool;
use crate::models::audit::AuditEntry;
use crate::models::settings::Setting;

#[derive(Debug, FromForm)]
pub struct LoginForm {
    pub password: String,
}

#[post("/login", data = "<form>")]
pub fn login_submit(
    form: Form<LoginForm>,
    pool: &State<DbPool>,
    cookies: &CookieJar<'_>,
    client_ip: ClientIp,
) -> Flash<Redirect> {
    let hash = Setting::get_or(pool, "admin_password_hash", "");
    if hash.is_empty() || !auth::verify_password(&form.password, &hash) {
        AuditEntry::log(
            pool,
            "unknown",
            "login_failed",
            None,
            None,
            None,
            Some(&client_ip.0),
        );
        return Flash::error(Redirect::to("/admin/login"), "Invalid password.");
    }

    match auth::create_session(pool, Some(&client_ip.0), None) {
        Ok(session_id) => {
            cookies.add_private(Cookie::new(SESSION_COOKIE, session_id));
            let admin = Setting::get_or(pool, "admin_display_name", "Admin");
            AuditEntry::log(pool, &admin, "login", None, None, None, Some(&client_ip.0));
            Flash::success(Redirect::to("/admin"), "Logged in.")
        }
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            Flash::error(Redirect::to("/admin/login"), "Login failed, try again.")
        }
    }
}

#[derive(Debug, FromForm)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
}

#[post("/password", data = "<form>")]
pub fn change_password(
    _admin: AdminUser,
    form: Form<PasswordForm>,
    pool: &State<DbPool>,
    client_ip: ClientIp,
) -> Flash<Redirect> {
    let hash = Setting::get_or(pool, "admin_password_hash", "");
    if !auth::verify_password(&form.current_password, &hash) {
        return Flash::error(Redirect::to("/admin"), "Current password is incorrect.");
    }
    if form.new_password.trim().len() < 8 {
        return Flash::error(
            Redirect::to("/admin"),
            "New password must be at least 8 characters.",
        );
    }

    let new_hash = match auth::hash_password(&form.new_password) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Password hash failed: {}", e);
            return Flash::error(Redirect::to("/admin"), "Password change failed.");
        }
    };

    match Setting::set(pool, "admin_password_hash", &new_hash) {
        Ok(()) => {
            let admin = Setting::get_or(pool, "admin_display_name", "Admin");
            AuditEntry::log(
                pool,
                &admin,
                "password_change",
                None,
                None,
                None,
                Some(&client_ip.0),
            );
            Flash::success(Redirect::to("/admin"), "Password updated.")
        }
        Err(e) => {
            log::error!("Failed to store password hash: {}", e);
            Flash::error(Redirect::to("/admin"), "Password change failed.")
        }
    }
}

#[post("/logout")]
pub fn logout(pool: &State<DbPool>, cookies: &CookieJar<'_>) -> Flash<Redirect> {
    if let Some(cookie) = cookies.get_private(SESSION_COOKIE) {
        auth::destroy_session(pool, cookie.value());
        cookies.remove_private(Cookie::from(SESSION_COOKIE));
    }
    Flash::success(Redirect::to("/admin/login"), "Logged out.")
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login_submit, change_password, logout]
}
