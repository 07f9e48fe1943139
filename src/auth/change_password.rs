use axum::{body::Bytes, debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use crate::{json_body, present, session, AppError, AppResult};

use super::password::{hash_password, verify_password};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordBody {
    current_password: Option<String>,
    new_password: Option<String>,
}

#[debug_handler]
pub(crate) async fn change_password(
    State(db_pool): State<SqlitePool>,
    session: Session,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let user = session::require_user(&session).await?;
    let ChangePasswordBody { current_password, new_password } = json_body(&body)?;

    let (Some(current_password), Some(new_password)) = (present(current_password), present(new_password)) else {
        return Err(AppError::Validation("Missing required fields".to_owned()));
    };

    update_password(&db_pool, user.id, &current_password, &new_password).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn update_password(
    db_pool: &SqlitePool,
    user_id: Uuid,
    current_password: &str,
    new_password: &str,
) -> AppResult<()> {
    if current_password == new_password {
        return Err(AppError::Validation("New password cannot be the same as current password".to_owned()));
    }

    let Some((stored_hash,)): Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE id=?")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?
    else {
        return Err(AppError::NotFound("User not found"));
    };

    if !verify_password(current_password.to_owned(), stored_hash).await? {
        return Err(AppError::Forbidden("Current password is incorrect"));
    }

    let new_hash = hash_password(new_password.to_owned()).await?;
    let updated = sqlx::query("UPDATE users SET password_hash=? WHERE id=?")
        .bind(new_hash)
        .bind(user_id)
        .execute(db_pool)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found"));
    }

    info!("password changed for #{user_id}");
    Ok(())
}
