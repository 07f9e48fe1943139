use axum::{debug_handler, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{db::{self, User}, present, AppError, AppResult};

use super::{normalize_username, password::hash_password};

#[derive(Deserialize)]
pub(crate) struct RegisterBody {
    username: Option<String>,
    password: Option<String>,
    name: Option<String>,
}

#[debug_handler]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    Json(RegisterBody { username, password, name }): Json<RegisterBody>,
) -> AppResult<impl IntoResponse> {
    let (Some(username), Some(password)) = (present(username), present(password)) else {
        return Err(AppError::Validation("Missing fields".to_owned()));
    };

    create_user(&db_pool, &username, &password, name.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// Stores a new account. The display name falls back to the username.
pub async fn create_user(
    db_pool: &SqlitePool,
    username: &str,
    password: &str,
    name: Option<&str>,
) -> AppResult<User> {
    let username = normalize_username(username);
    if username.is_empty() {
        return Err(AppError::Validation("Missing fields".to_owned()));
    }

    let existing = sqlx::query("SELECT 1 FROM users WHERE username=?")
        .bind(&username)
        .fetch_optional(db_pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".to_owned()));
    }

    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(&username)
        .to_owned();

    let user = User {
        id: Uuid::now_v7(),
        password_hash: hash_password(password.to_owned()).await?,
        created_at: OffsetDateTime::now_utc(),
        username,
        name,
    };

    // the hash takes a while, someone may have claimed the name meanwhile
    sqlx::query("INSERT INTO users (id,username,name,password_hash,created_at) VALUES (?,?,?,?,?)")
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(db_pool)
        .await
        .map_err(|err| match db::is_unique_violation(&err) {
            true => AppError::Conflict("User already exists".to_owned()),
            false => err.into(),
        })?;

    info!("registered @{}#{}", user.username, user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn username_is_normalized_and_name_defaults() {
        let db_pool = db::connect_in_memory().await.unwrap();

        let user = create_user(&db_pool, "  Alice ", "pw123456", None).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.name, "alice");

        let bob = create_user(&db_pool, "bob", "pw123456", Some(" Bob ")).await.unwrap();
        assert_eq!(bob.name, "Bob");
    }

    #[tokio::test]
    async fn duplicate_username_conflicts_and_keeps_hash() {
        let db_pool = db::connect_in_memory().await.unwrap();
        let original = create_user(&db_pool, "alice", "pw123456", Some("Alice")).await.unwrap();

        let err = create_user(&db_pool, "ALICE", "other-password", None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let (hash,): (String,) = sqlx::query_as("SELECT password_hash FROM users WHERE username=?")
            .bind("alice")
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(hash, original.password_hash);
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let db_pool = db::connect_in_memory().await.unwrap();
        let err = create_user(&db_pool, "   ", "pw123456", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
