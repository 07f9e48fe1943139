mod change_password;
mod login;
mod logout;
mod password;
mod register;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub use change_password::update_password;
pub use login::authenticate;
pub use password::{hash_password, verify_password};
pub use register::create_user;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register::register))
        .route("/api/auth/login", post(login::login))
        .route("/api/auth/logout", post(logout::logout))
        .route("/api/auth/session", get(login::whoami))
        .route("/api/change-password", post(change_password::change_password))
}

pub(crate) fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}
