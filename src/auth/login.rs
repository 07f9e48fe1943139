use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{db::User, present, session::{self, SessionUser}, AppError, AppResult};

use super::{normalize_username, password::{burn_verification, verify_password}};

#[derive(Deserialize)]
pub(crate) struct LoginBody {
    username: Option<String>,
    password: Option<String>,
}

#[debug_handler]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(LoginBody { username, password }): Json<LoginBody>,
) -> AppResult<Json<Value>> {
    let (Some(username), Some(password)) = (present(username), present(password)) else {
        return Err(AppError::Validation("Missing fields".to_owned()));
    };

    let Some(user) = authenticate(&db_pool, &username, &password).await? else {
        warn!("failed sign-in for {username:?}");
        return Err(AppError::Unauthorized("Invalid username or password"));
    };

    let session_user = SessionUser { id: user.id, name: user.name };
    session::sign_in(&session, session_user.clone()).await?;

    info!("welcome @{}#{}", user.username, user.id);
    Ok(Json(json!({ "user": session_user })))
}

#[debug_handler]
pub(crate) async fn whoami(session: Session) -> AppResult<Json<Value>> {
    Ok(Json(json!({ "user": session::current_user(&session).await? })))
}

/// `None` for both an unknown username and a wrong password.
pub async fn authenticate(db_pool: &SqlitePool, username: &str, password: &str) -> AppResult<Option<User>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username=?")
        .bind(normalize_username(username))
        .fetch_optional(db_pool)
        .await?;

    let Some(user) = user else {
        burn_verification(password.to_owned()).await?;
        return Ok(None);
    };

    match verify_password(password.to_owned(), user.password_hash.clone()).await? {
        true => Ok(Some(user)),
        false => Ok(None),
    }
}
